use super::consts::home;
use crate::error::{MobupError, Result};
use std::path::{Path, PathBuf};

/// Locations below the mobup home directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    root: PathBuf,
}

impl HomeLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$MOBUP_HOME` is handled by the CLI; this is the fallback `~/.mobup`
    pub fn default_root() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(home::DIR_NAME))
            .ok_or_else(|| MobupError::ConfigError("cannot determine home directory".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn toolchains_dir(&self) -> PathBuf {
        self.root.join(home::TOOLCHAINS_DIR)
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.root.join(home::CATALOG_FILE)
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.root.join(project)
    }

    /// The GOPATH shared by every module root of `project`
    pub fn workspace_dir(&self, project: &str) -> PathBuf {
        self.project_dir(project).join(home::WORKSPACE_DIR)
    }

    pub fn cache_file(&self, project: &str) -> PathBuf {
        self.project_dir(project).join(home::CACHE_FILE)
    }
}
