//! Filesystem helpers shared by the provisioner and the merger

use crate::error::{MobupError, Result};
use std::fs;
use std::path::Path;

/// Recursively copies `src` into `dst`, creating `dst` as needed.
///
/// Symlinks are recreated rather than followed on Unix.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| MobupError::io(format!("create {}", dst.display()), e))?;
    let entries =
        fs::read_dir(src).map_err(|e| MobupError::io(format!("read {}", src.display()), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| MobupError::io(format!("read {}", src.display()), e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| MobupError::io(format!("stat {}", from.display()), e))?;

        if file_type.is_dir() {
            copy_tree(&from, &to)?;
        } else if file_type.is_symlink() {
            copy_symlink(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| {
                MobupError::io(format!("copy {} to {}", from.display(), to.display()), e)
            })?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target = fs::read_link(from)
        .map_err(|e| MobupError::io(format!("read link {}", from.display()), e))?;
    std::os::unix::fs::symlink(&target, to)
        .map_err(|e| MobupError::io(format!("link {}", to.display()), e))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| MobupError::io(format!("copy {} to {}", from.display(), to.display()), e))
}

/// Removes a directory tree; a missing directory is not an error
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MobupError::io(format!("remove {}", path.display()), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_tree_preserves_layout() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::write(src.join("a/b/file.go"), "package b").unwrap();
        fs::write(src.join("go.mod"), "module x").unwrap();

        let dst = temp.path().join("dst/nested");
        copy_tree(&src, &dst).unwrap();

        assert_eq!(
            mobup_testkit::hash_tree(&src),
            mobup_testkit::hash_tree(&dst)
        );
    }

    #[test]
    fn test_remove_missing_dir_is_ok() {
        let temp = TempDir::new().unwrap();
        remove_dir_all_if_exists(&temp.path().join("missing")).unwrap();

        let present = temp.path().join("present");
        fs::create_dir_all(present.join("x")).unwrap();
        remove_dir_all_if_exists(&present).unwrap();
        assert!(!present.exists());
    }
}
