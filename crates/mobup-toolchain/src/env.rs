//! Environment derived from the installed toolchains

use crate::catalog::ResourceCatalog;
use crate::install::{Provisioner, ToolchainInstallation};
use crate::platform::Platform;
use mobup_core::config::ToolchainPins;
use mobup_core::{MobupError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Every toolchain a gomobile build needs
#[derive(Debug, Clone)]
pub struct ToolchainSet {
    pub go: ToolchainInstallation,
    pub gomobile: ToolchainInstallation,
    pub ndk: ToolchainInstallation,
    pub sdk: ToolchainInstallation,
    pub jdk: ToolchainInstallation,
}

/// Resolves and installs the pinned versions; the first failure aborts
pub fn provision_toolchains(
    provisioner: &Provisioner,
    catalog: &ResourceCatalog,
    pins: &ToolchainPins,
    platform: &Platform,
) -> Result<ToolchainSet> {
    let install = |name: &str, version: &str| {
        let resource = catalog.get_for(name, version, platform)?;
        provisioner.provision(resource)
    };
    Ok(ToolchainSet {
        go: install("go", &pins.go)?,
        gomobile: install("gomobile", &pins.gomobile)?,
        ndk: install("ndk", &pins.ndk)?,
        sdk: install("sdk", &pins.sdk)?,
        jdk: install("jdk", &pins.jdk)?,
    })
}

/// Directory layout of one project's toolchain environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainLayout {
    pub goroot: PathBuf,
    pub gopath: PathBuf,
    pub java_home: PathBuf,
    pub sdk_root: PathBuf,
    pub ndk_root: PathBuf,
    pub gomobile_sources: PathBuf,
    pub gomobile_version: String,
}

impl ToolchainLayout {
    pub fn new(set: &ToolchainSet, workspace: &Path, platform: &Platform) -> Self {
        let java_home = if platform.is_darwin() {
            set.jdk.path.join("Contents").join("Home")
        } else {
            set.jdk.path.clone()
        };
        Self {
            goroot: set.go.path.clone(),
            gopath: workspace.to_path_buf(),
            java_home,
            sdk_root: set.sdk.path.clone(),
            ndk_root: set.ndk.path.clone(),
            gomobile_sources: set.gomobile.path.clone(),
            gomobile_version: set.gomobile.version.clone(),
        }
    }

    pub fn go_binary(&self) -> PathBuf {
        self.goroot.join("bin").join("go")
    }

    pub fn gomobile_binary(&self) -> PathBuf {
        self.gopath.join("bin").join("gomobile")
    }

    /// Toolchain variables, including a `PATH` that puts the toolchains
    /// first and drops system Go installs from `inherited_path`
    pub fn variables(
        &self,
        inherited_path: Option<&str>,
        user_home: Option<&Path>,
    ) -> Result<Vec<(String, String)>> {
        let mut entries = vec![
            self.goroot.join("bin"),
            self.gopath.join("bin"),
            self.java_home.join("bin"),
            self.sdk_root.clone(),
            self.sdk_root.join("bin"),
        ];
        entries.extend(clean_path(inherited_path.unwrap_or(""), user_home));
        let path = join_unique(entries)?;

        let display = |p: &Path| p.to_string_lossy().into_owned();
        Ok(vec![
            ("GOROOT".to_string(), display(&self.goroot)),
            ("GOPATH".to_string(), display(&self.gopath)),
            ("JAVA_HOME".to_string(), display(&self.java_home)),
            ("ANDROID_HOME".to_string(), display(&self.sdk_root)),
            ("ANDROID_SDK_ROOT".to_string(), display(&self.sdk_root)),
            ("ANDROID_NDK_HOME".to_string(), display(&self.ndk_root)),
            ("NDK_PATH".to_string(), display(&self.ndk_root)),
            ("PATH".to_string(), path.to_string_lossy().into_owned()),
        ])
    }
}

/// Splits `path` and removes entries that would shadow the managed Go
pub fn clean_path(path: &str, user_home: Option<&Path>) -> Vec<PathBuf> {
    let system_go = PathBuf::from("/usr/local/go/bin");
    let user_go = user_home.map(|h| h.join("go").join("bin"));
    std::env::split_paths(path)
        .filter(|p| !p.as_os_str().is_empty())
        .filter(|p| *p != system_go && Some(p) != user_go.as_ref())
        .collect()
}

fn join_unique(entries: Vec<PathBuf>) -> Result<OsString> {
    let mut unique: Vec<PathBuf> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    std::env::join_paths(unique)
        .map_err(|e| MobupError::ConfigError(format!("invalid PATH entry: {e}")))
}
