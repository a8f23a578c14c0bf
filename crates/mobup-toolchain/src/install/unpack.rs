//! Promotion of an extracted tree into its final location

use super::InstallError;
use mobup_core::log::{Event, LogContext};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level archive debris left by macOS tooling
fn is_garbage(name: &str, is_dir: bool) -> bool {
    name == ".DS_Store"
        || name == "__MACOSX"
        || name.starts_with("._")
        || (!is_dir && name.starts_with('.'))
}

/// Removes garbage entries directly below `dir` and returns what remains
pub fn strip_garbage(dir: &Path, log: &LogContext) -> Result<Vec<PathBuf>, InstallError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| InstallError::io(format!("read {}", dir.display()), e))?;

    let mut kept = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| InstallError::io(format!("read {}", dir.display()), e))?;
        let path = entry.path();
        let is_dir = entry
            .file_type()
            .map_err(|e| InstallError::io(format!("stat {}", path.display()), e))?
            .is_dir();
        if is_garbage(&entry.file_name().to_string_lossy(), is_dir) {
            log.emit(Event::Remove { path: &path });
            let removed = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| InstallError::io(format!("remove {}", path.display()), e))?;
        } else {
            kept.push(path);
        }
    }
    kept.sort();
    Ok(kept)
}

/// Moves an extracted tree to `target`.
///
/// A single top-level directory is unwrapped so that `target` holds its
/// contents; anything else moves as a whole.
pub fn promote(extracted: &Path, target: &Path, log: &LogContext) -> Result<(), InstallError> {
    let remaining = strip_garbage(extracted, log)?;
    let source = match remaining.as_slice() {
        [] => return Err(InstallError::Empty),
        [only] if only.is_dir() => only.as_path(),
        _ => extracted,
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| InstallError::io(format!("create {}", parent.display()), e))?;
    }
    log.emit(Event::Move {
        from: source,
        to: target,
    });
    fs::rename(source, target).map_err(|e| {
        InstallError::io(
            format!("rename {} to {}", source.display(), target.display()),
            e,
        )
    })
}
