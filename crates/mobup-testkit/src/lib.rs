//! Test utilities for mobup
//!
//! Shared fixtures used across the mobup workspace: scratch directories,
//! in-memory archives for provisioning tests, fake Go module trees and a
//! content hash for whole directory trees.

use tempfile::TempDir;

pub mod archive;
pub mod modules;
pub mod tree;

pub use archive::{tar_gz, tar_xz, zip};
pub use tree::hash_tree;

/// Creates a temporary directory within `.tmp/` at the current directory.
///
/// Keeps scratch files of all tests in one gitignored place.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot be
/// created.
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Non-panicking variant of [`temp_dir_in_workspace`]
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let tmp_base = std::env::current_dir()?.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}
