//! Toolchain provisioning
//!
//! Each catalog resource is installed once into
//! `<home>/toolchains/<name>-<version>`. Installation downloads the archive
//! to `<toolchains>/<sha256(url)>.tmp`, extracts it into
//! `<target>.tmp`, strips macOS debris, unwraps a single top-level directory
//! and renames the result into place. The final rename is the only step that
//! touches the target, so a failed run never leaves a partial toolchain
//! behind. Callers hold the toolchain lock for the whole call.

use crate::catalog::Resource;
use crate::http::{Purpose, download_to_file};
use mobup_core::log::{Event, LogContext};
use mobup_core::{MobupError, Result};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

mod error;
mod extract;
mod unpack;

pub use error::InstallError;
pub use extract::{ArchiveFormat, extract};
pub use unpack::{promote, strip_garbage};

type InstallResult<T> = std::result::Result<T, InstallError>;

/// An installed toolchain on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInstallation {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
}

/// Removes the listed temporaries when dropped, whatever the outcome
struct Scratch<'a> {
    paths: Vec<PathBuf>,
    log: &'a LogContext,
}

impl<'a> Scratch<'a> {
    fn new(log: &'a LogContext) -> Self {
        Self {
            paths: Vec::new(),
            log,
        }
    }

    /// Registers `path`, clearing leftovers from an interrupted run first
    fn track(&mut self, path: PathBuf) -> InstallResult<PathBuf> {
        remove_any(&path)
            .map_err(|e| InstallError::io(format!("remove stale {}", path.display()), e))?;
        self.paths.push(path.clone());
        Ok(path)
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        for path in &self.paths {
            self.log.best_effort("remove temporary", path, remove_any(path));
        }
    }
}

fn remove_any(path: &Path) -> std::io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

pub struct Provisioner {
    toolchains_dir: PathBuf,
    client: Client,
    log: LogContext,
}

impl Provisioner {
    pub fn new(toolchains_dir: impl Into<PathBuf>, log: LogContext) -> Result<Self> {
        let client = Purpose::Archive
            .client()
            .map_err(|e| MobupError::Network(e.to_string()))?;
        Ok(Self::with_client(toolchains_dir, client, log))
    }

    pub fn with_client(toolchains_dir: impl Into<PathBuf>, client: Client, log: LogContext) -> Self {
        Self {
            toolchains_dir: toolchains_dir.into(),
            client,
            log,
        }
    }

    pub fn toolchains_dir(&self) -> &Path {
        &self.toolchains_dir
    }

    pub fn install_path(&self, resource: &Resource) -> PathBuf {
        self.toolchains_dir.join(resource.install_name())
    }

    /// Installs `resource` unless it is already present
    pub fn provision(&self, resource: &Resource) -> Result<ToolchainInstallation> {
        let target = self.install_path(resource);
        let name = resource.install_name();
        let installation = ToolchainInstallation {
            name: resource.name.clone(),
            version: resource.version.clone(),
            path: target.clone(),
        };

        if target.exists() {
            self.log.emit(Event::ToolchainPresent {
                resource: &name,
                path: &target,
            });
            return Ok(installation);
        }

        self.install(resource, &target)
            .map_err(|e| MobupError::ProvisioningFailed {
                resource: name.clone(),
                reason: e.to_string(),
            })?;
        self.log.emit(Event::Installed {
            resource: &name,
            path: &target,
        });
        Ok(installation)
    }

    fn install(&self, resource: &Resource, target: &Path) -> InstallResult<()> {
        let format = ArchiveFormat::from_url(&resource.url)
            .ok_or_else(|| InstallError::UnsupportedFormat(resource.url.clone()))?;

        let mut scratch = Scratch::new(&self.log);
        let archive = scratch.track(self.archive_path(&resource.url))?;
        let extracted = scratch.track(with_tmp_suffix(target))?;

        download_to_file(&self.client, &resource.url, &archive, &self.log)?;
        extract(&archive, format, &extracted)?;
        promote(&extracted, target, &self.log)
    }

    fn archive_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.toolchains_dir.join(format!("{digest:x}.tmp"))
    }
}

fn with_tmp_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
