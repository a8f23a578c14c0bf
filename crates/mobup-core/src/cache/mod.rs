//! Content-hash build cache
//!
//! A build is skipped only when both the inputs (build file and local Go
//! sources) and the previously produced outputs hash to the values stored
//! after the last successful build. Anything that prevents the comparison
//! counts as "rebuild".

use crate::error::{MobupError, Result};
use crate::log::{Event, LogContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod hash;

pub use hash::{ArtifactOutput, input_hash, output_hash};

/// Persisted hash pair; both fields are only meaningful together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCache {
    pub in_hash: String,
    pub out_hash: String,
}

impl ArtifactCache {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MobupError::CacheUnreadable(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| MobupError::CacheUnreadable(format!("{}: {e}", path.display())))
    }

    /// Writes the cache with temp file + rename so readers never see a torn file
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            MobupError::CacheUnreadable(format!("{} has no parent directory", path.display()))
        })?;
        std::fs::create_dir_all(parent)
            .map_err(|e| MobupError::io(format!("create {}", parent.display()), e))?;
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| MobupError::CacheUnreadable(format!("serialize: {e}")))?;
        atomic_write(&content, path, parent)
    }
}

fn atomic_write(content: &str, path: &Path, parent: &Path) -> Result<()> {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut temp_file = NamedTempFile::new_in(parent)
        .map_err(|e| MobupError::io(format!("create temp file in {}", parent.display()), e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| MobupError::io("write temp file", e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| MobupError::io("sync temp file", e))?;
    temp_file
        .persist(path)
        .map_err(|e| MobupError::io(format!("persist {}", path.display()), e.error))?;

    #[cfg(unix)]
    {
        let dir = std::fs::File::open(parent)
            .map_err(|e| MobupError::io(format!("open {}", parent.display()), e))?;
        dir.sync_all()
            .map_err(|e| MobupError::io(format!("sync {}", parent.display()), e))?;
    }

    Ok(())
}

/// Decides whether the external compile has to run for one project
#[derive(Debug, Clone)]
pub struct BuildCache {
    cache_file: PathBuf,
    build_file: PathBuf,
    module_roots: Vec<PathBuf>,
    outputs: Vec<ArtifactOutput>,
    log: LogContext,
}

impl BuildCache {
    /// `module_roots` may include remote specifiers; only existing
    /// directories are hashed.
    pub fn new(
        cache_file: impl Into<PathBuf>,
        build_file: impl Into<PathBuf>,
        module_roots: Vec<PathBuf>,
        outputs: Vec<ArtifactOutput>,
        log: LogContext,
    ) -> Self {
        Self {
            cache_file: cache_file.into(),
            build_file: build_file.into(),
            module_roots,
            outputs,
            log,
        }
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    pub fn current(&self) -> Result<ArtifactCache> {
        Ok(ArtifactCache {
            in_hash: input_hash(&self.build_file, &self.module_roots, &self.log)?,
            out_hash: output_hash(&self.outputs, &self.log)?,
        })
    }

    /// True unless the stored hash pair matches the current state exactly
    pub fn is_build_required(&self) -> Result<bool> {
        let stored = match ArtifactCache::load(&self.cache_file) {
            Ok(stored) => stored,
            Err(e) => {
                self.log.emit(Event::CacheUnreadable {
                    path: &self.cache_file,
                    error: &e.to_string(),
                });
                return Ok(true);
            }
        };

        let current = self.current()?;
        if current == stored {
            self.log.emit(Event::CacheFresh);
            Ok(false)
        } else {
            self.log.emit(Event::CacheStale);
            Ok(true)
        }
    }

    /// Recomputes both hashes and persists them
    pub fn update(&self) -> Result<ArtifactCache> {
        let current = self.current()?;
        current.save(&self.cache_file)?;
        self.log.emit(Event::CacheSaved {
            path: &self.cache_file,
        });
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Target;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
        aar: PathBuf,
        cache: BuildCache,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let build_file = temp.path().join("mobup.toml");
        fs::write(&build_file, "name = \"demo\"\n").unwrap();
        let root = temp.path().join("libGo");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("go.mod"), "module example.com/lib\n").unwrap();
        fs::write(root.join("lib.go"), "package lib\n").unwrap();
        let aar = temp.path().join("out").join("lib.aar");

        let cache = BuildCache::new(
            temp.path().join("home/demo/artifacts.json"),
            &build_file,
            vec![root.clone()],
            vec![ArtifactOutput {
                target: Target::Android,
                path: aar.clone(),
            }],
            LogContext::new("cache-test"),
        );
        Fixture {
            _temp: temp,
            root,
            aar,
            cache,
        }
    }

    #[test]
    fn test_missing_cache_requires_build() {
        let f = fixture();
        assert!(f.cache.is_build_required().unwrap());
    }

    #[test]
    fn test_corrupt_cache_requires_build() {
        let f = fixture();
        fs::create_dir_all(f.cache.cache_file().parent().unwrap()).unwrap();
        fs::write(f.cache.cache_file(), "{ not json").unwrap();
        assert!(f.cache.is_build_required().unwrap());
    }

    #[test]
    fn test_fresh_after_update() {
        let f = fixture();
        fs::create_dir_all(f.aar.parent().unwrap()).unwrap();
        fs::write(&f.aar, "aar bytes").unwrap();

        let saved = f.cache.update().unwrap();
        assert!(!f.cache.is_build_required().unwrap());

        let on_disk = ArtifactCache::load(f.cache.cache_file()).unwrap();
        assert_eq!(on_disk, saved);
    }

    #[test]
    fn test_input_change_invalidates() {
        let f = fixture();
        f.cache.update().unwrap();
        fs::write(f.root.join("lib.go"), "package lib\n\nfunc X() {}\n").unwrap();
        assert!(f.cache.is_build_required().unwrap());
    }

    #[test]
    fn test_output_change_invalidates() {
        let f = fixture();
        fs::create_dir_all(f.aar.parent().unwrap()).unwrap();
        fs::write(&f.aar, "aar v1").unwrap();
        f.cache.update().unwrap();

        fs::remove_file(&f.aar).unwrap();
        assert!(f.cache.is_build_required().unwrap());
    }

    #[test]
    fn test_cache_file_format() {
        let f = fixture();
        f.cache.update().unwrap();
        let raw = fs::read_to_string(f.cache.cache_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("in_hash").and_then(|v| v.as_str()).is_some());
        assert!(value.get("out_hash").and_then(|v| v.as_str()).is_some());
    }
}
