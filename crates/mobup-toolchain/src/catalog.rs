//! Resource catalog
//!
//! The catalog maps `(name, version, os, arch)` to a download URL. A local
//! copy lives at `<home>/resources.toml` and is refreshed from a remote URL
//! once it is older than a day:
//!
//! ```toml
//! [[resource]]
//! name = "go"
//! version = "1.12.4"
//! os = "linux"
//! arch = "amd64"
//! url = "https://dl.google.com/go/go1.12.4.linux-amd64.tar.gz"
//!
//! [[resource]]
//! name = "gomobile"
//! version = "wdy-v0.0.1"
//! url = "https://example.com/gomobile-wdy-v0.0.1.tar.gz"
//! ```
//!
//! Entries without `os` and `arch` apply to every platform.

use crate::http::{Purpose, download_to_file};
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use mobup_core::log::{Event, LogContext};
use mobup_core::{MobupError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the catalog is fetched from unless `--resources` overrides it
pub const DEFAULT_CATALOG_URL: &str = "https://mobup.dev/resources.toml";

const MAX_CATALOG_AGE_HOURS: i64 = 24;

/// Age after which the local catalog is downloaded again
pub fn max_catalog_age() -> chrono::Duration {
    chrono::Duration::hours(MAX_CATALOG_AGE_HOURS)
}

/// One downloadable archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub arch: String,
    pub url: String,
}

impl Resource {
    /// `<name>-<version>`, the directory name below `<home>/toolchains`
    pub fn install_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    fn is_platform_neutral(&self) -> bool {
        self.os.is_empty() && self.arch.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCatalog {
    #[serde(default, rename = "resource")]
    resources: Vec<Resource>,
}

impl ResourceCatalog {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MobupError::ConfigError(format!("invalid resource catalog: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MobupError::io(format!("read {}", path.display()), e))?;
        Self::from_toml(&content)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Looks up a resource for the running platform
    pub fn get(&self, name: &str, version: &str) -> Result<&Resource> {
        self.get_for(name, version, &Platform::current())
    }

    /// Exact platform match first, then a platform-neutral entry
    pub fn get_for(&self, name: &str, version: &str, platform: &Platform) -> Result<&Resource> {
        let candidates = || {
            self.resources
                .iter()
                .filter(move |r| r.name == name && r.version == version)
        };
        candidates()
            .find(|r| r.os == platform.os && r.arch == platform.arch)
            .or_else(|| candidates().find(|r| r.is_platform_neutral()))
            .ok_or_else(|| MobupError::ResourceNotFound {
                name: name.to_string(),
                version: version.to_string(),
                os: platform.os.clone(),
                arch: platform.arch.clone(),
            })
    }
}

/// True when `file` is missing or its mtime is more than `max_age` before `now`
pub fn is_stale(file: &Path, max_age: chrono::Duration, now: DateTime<Utc>) -> bool {
    let Ok(modified) = std::fs::metadata(file).and_then(|m| m.modified()) else {
        return true;
    };
    let modified: DateTime<Utc> = modified.into();
    now.signed_duration_since(modified) > max_age
}

/// Loads the local catalog, downloading it first if it is stale.
///
/// A failed refresh is fatal; a stale copy is never used as a fallback.
pub fn load_or_refresh(file: &Path, url: &str, log: &LogContext) -> Result<ResourceCatalog> {
    if is_stale(file, max_catalog_age(), Utc::now()) {
        log.emit(Event::CatalogRefresh { url, file });
        refresh(file, url, log)?;
    }
    let catalog = ResourceCatalog::from_file(file)?;
    log.emit(Event::CatalogLoaded {
        file,
        entries: catalog.len(),
    });
    Ok(catalog)
}

/// Downloads the catalog next to `file`, validates it and renames it over `file`
fn refresh(file: &Path, url: &str, log: &LogContext) -> Result<()> {
    let parent = file
        .parent()
        .ok_or_else(|| MobupError::ConfigError(format!("{} has no parent", file.display())))?;
    std::fs::create_dir_all(parent)
        .map_err(|e| MobupError::io(format!("create {}", parent.display()), e))?;

    let staging = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| MobupError::io(format!("create temp file in {}", parent.display()), e))?;
    let client = Purpose::Catalog.client().map_err(|e| MobupError::Network(e.to_string()))?;
    download_to_file(&client, url, staging.path(), log)?;

    ResourceCatalog::from_file(staging.path())?;
    staging
        .persist(file)
        .map_err(|e| MobupError::io(format!("persist {}", file.display()), e.error))?;
    Ok(())
}
