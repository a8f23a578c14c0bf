use sha2::{Digest, Sha256};
use std::path::Path;
use walkdir::WalkDir;

/// Hex SHA-256 over every relative path and file body below `root`.
///
/// Two trees hash equal only if they hold the same files with the same
/// contents.
pub fn hash_tree(root: &Path) -> String {
    let mut sha = Sha256::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(root).unwrap();
        sha.update(relative.to_string_lossy().as_bytes());
        if entry.file_type().is_file() {
            sha.update(b"F");
            sha.update(std::fs::read(entry.path()).unwrap());
        } else {
            sha.update(b"D");
        }
    }
    format!("{:x}", sha.finalize())
}
