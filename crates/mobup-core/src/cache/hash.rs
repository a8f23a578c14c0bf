//! Content hashing of build inputs and outputs

use crate::config::Target;
use crate::error::{MobupError, Result};
use crate::log::{Event, HashKind, LogContext};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const INPUT_SUFFIXES: [&str; 3] = [".go", "go.mod", "go.sum"];
const FRAMEWORK_SUFFIXES: [&str; 3] = [".h", ".plist", ".modulemap"];

/// One built artifact and the target that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutput {
    pub target: Target,
    pub path: PathBuf,
}

struct TreeHasher<'a> {
    sha: Sha256,
    files: usize,
    kind: HashKind,
    log: &'a LogContext,
}

impl<'a> TreeHasher<'a> {
    fn new(kind: HashKind, log: &'a LogContext) -> Self {
        Self {
            sha: Sha256::new(),
            files: 0,
            kind,
            log,
        }
    }

    fn add_bytes(&mut self, bytes: &[u8]) {
        self.sha.update(bytes);
    }

    fn add_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)
            .map_err(|e| MobupError::io(format!("read {}", path.display()), e))?;
        self.sha.update(&bytes);
        self.files += 1;
        self.log.emit(Event::Hashed {
            kind: self.kind,
            file: path,
        });
        Ok(())
    }

    /// Hashes every matching file below `root`, in lexical order.
    ///
    /// Hidden entries below the root are skipped together with their subtree.
    fn add_tree(&mut self, root: &Path, suffixes: &[&str]) -> Result<()> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                MobupError::io(
                    format!("walk {}", path.display()),
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !suffixes.iter().any(|s| name.ends_with(s)) {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            self.add_bytes(relative.to_string_lossy().as_bytes());
            self.add_file(entry.path())?;
        }
        Ok(())
    }

    fn finish(self) -> String {
        let hash = URL_SAFE.encode(self.sha.finalize());
        self.log.emit(Event::HashComputed {
            kind: self.kind,
            hash: &hash,
            files: self.files,
        });
        hash
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Hash of the build file followed by the Go sources of every module root.
/// Callers pass local roots only; a root that is not a directory is skipped.
pub fn input_hash(build_file: &Path, module_roots: &[PathBuf], log: &LogContext) -> Result<String> {
    let mut hasher = TreeHasher::new(HashKind::Input, log);
    hasher.add_file(build_file)?;
    for root in module_roots.iter().filter(|r| r.is_dir()) {
        hasher.add_tree(root, &INPUT_SUFFIXES)?;
    }
    Ok(hasher.finish())
}

/// Hash of the produced artifacts; missing artifacts still contribute their path
pub fn output_hash(outputs: &[ArtifactOutput], log: &LogContext) -> Result<String> {
    let mut hasher = TreeHasher::new(HashKind::Output, log);
    for output in outputs {
        hasher.add_bytes(output.path.to_string_lossy().as_bytes());
        match output.target {
            Target::Android => {
                if output.path.is_file() {
                    hasher.add_file(&output.path)?;
                }
            }
            Target::Ios => {
                if output.path.is_dir() {
                    hasher.add_tree(&output.path, &FRAMEWORK_SUFFIXES)?;
                }
            }
        }
    }
    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn log() -> LogContext {
        LogContext::new("hash-test")
    }

    fn fixture() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let build_file = temp.path().join("mobup.toml");
        fs::write(&build_file, "name = \"demo\"\n").unwrap();
        let root = temp.path().join("libGo");
        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::write(root.join("go.mod"), "module example.com/lib\n").unwrap();
        fs::write(root.join("pkg/a.go"), "package pkg\n").unwrap();
        (temp, build_file, root)
    }

    #[test]
    fn test_input_hash_ignores_unrelated_and_hidden_files() {
        let (_temp, build_file, root) = fixture();
        let before = input_hash(&build_file, &[root.clone()], &log()).unwrap();

        fs::write(root.join("README.md"), "docs").unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/x.go"), "package x").unwrap();
        fs::write(root.join("pkg/.hidden.go"), "package pkg").unwrap();

        let after = input_hash(&build_file, &[root], &log()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_input_hash_tracks_sources_and_build_file() {
        let (_temp, build_file, root) = fixture();
        let base = input_hash(&build_file, &[root.clone()], &log()).unwrap();

        fs::write(root.join("pkg/a.go"), "package pkg // changed\n").unwrap();
        let source_changed = input_hash(&build_file, &[root.clone()], &log()).unwrap();
        assert_ne!(base, source_changed);

        fs::write(&build_file, "name = \"other\"\n").unwrap();
        let manifest_changed = input_hash(&build_file, &[root], &log()).unwrap();
        assert_ne!(source_changed, manifest_changed);
    }

    #[test]
    fn test_input_hash_skips_remote_roots() {
        let (_temp, build_file, root) = fixture();
        let local = input_hash(&build_file, &[root.clone()], &log()).unwrap();
        let with_remote = input_hash(
            &build_file,
            &[root, PathBuf::from("/nonexistent/github.com/acme/remote")],
            &log(),
        )
        .unwrap();
        assert_eq!(local, with_remote);
    }

    #[test]
    fn test_output_hash_is_url_safe_base64() {
        let temp = TempDir::new().unwrap();
        let outputs = vec![ArtifactOutput {
            target: Target::Android,
            path: temp.path().join("lib.aar"),
        }];
        let hash = output_hash(&outputs, &log()).unwrap();
        assert_eq!(hash.len(), 44);
        assert!(!hash.contains('+') && !hash.contains('/'));
    }

    #[test]
    fn test_output_hash_covers_framework_headers_only() {
        let temp = TempDir::new().unwrap();
        let framework = temp.path().join("Lib.framework");
        fs::create_dir_all(framework.join("Headers")).unwrap();
        fs::write(framework.join("Headers/Lib.h"), "// v1").unwrap();
        fs::write(framework.join("Lib"), "binary v1").unwrap();
        let outputs = vec![ArtifactOutput {
            target: Target::Ios,
            path: framework.clone(),
        }];
        let first = output_hash(&outputs, &log()).unwrap();

        fs::write(framework.join("Lib"), "binary v2").unwrap();
        assert_eq!(first, output_hash(&outputs, &log()).unwrap());

        fs::write(framework.join("Headers/Lib.h"), "// v2").unwrap();
        assert_ne!(first, output_hash(&outputs, &log()).unwrap());
    }
}
