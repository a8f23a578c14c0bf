//! One-time preparation of the gomobile workspace and the Android SDK

use crate::env::ToolchainLayout;
use mobup_core::exec::{CommandSpec, ProcessRunner};
use mobup_core::fs::{copy_tree, remove_dir_all_if_exists};
use mobup_core::log::LogContext;
use mobup_core::{MobupError, Result};
use std::fs;
use std::path::Path;

pub const GOMOBILE_VERSION_FILE: &str = "gomobile.version";

const SDK_PACKAGES: [&str; 2] = ["platforms;android-28", "build-tools;28.0.3"];

/// Entries `sdkmanager` leaves in its parent directory instead of the SDK root
const MISPLACED_SDK_ENTRIES: [&str; 4] = [".knownPackages", "licenses", "platforms", "build-tools"];

/// Installs the frozen gomobile snapshot into the workspace.
///
/// Returns `false` when the workspace already carries this version. Otherwise
/// the workspace is wiped, so this must run before any module is merged.
pub fn prepare_gomobile(layout: &ToolchainLayout, runner: &ProcessRunner) -> Result<bool> {
    let workspace = &layout.gopath;
    let marker = workspace.join(GOMOBILE_VERSION_FILE);
    if read_version(&marker).as_deref() == Some(layout.gomobile_version.as_str()) {
        return Ok(false);
    }

    fs::create_dir_all(workspace)
        .map_err(|e| MobupError::io(format!("create {}", workspace.display()), e))?;
    let go = CommandSpec::program_path(&layout.go_binary()).current_dir(workspace);

    // Module cache entries are read-only; only go itself can remove them
    runner.run(&go.clone().args(["clean", "-modcache"]))?;

    remove_dir_all_if_exists(workspace)?;
    fs::create_dir_all(workspace)
        .map_err(|e| MobupError::io(format!("create {}", workspace.display()), e))?;
    copy_tree(&layout.gomobile_sources, &workspace.join("src"))?;

    runner.run(&go.clone().args(["install", "golang.org/x/mobile/cmd/gobind@latest"]))?;
    runner.run(&go.args(["install", "golang.org/x/mobile/cmd/gomobile@latest"]))?;
    runner.run(
        &CommandSpec::program_path(&layout.gomobile_binary())
            .arg("init")
            .current_dir(workspace),
    )?;

    fs::write(&marker, &layout.gomobile_version)
        .map_err(|e| MobupError::io(format!("write {}", marker.display()), e))?;
    Ok(true)
}

/// Installs the SDK platform packages once and moves misplaced entries into
/// the SDK root. Returns `false` when the SDK was already complete.
pub fn prepare_android_sdk(
    layout: &ToolchainLayout,
    runner: &ProcessRunner,
    log: &LogContext,
) -> Result<bool> {
    let sdk = &layout.sdk_root;
    if sdk.join("platforms").exists() {
        return Ok(false);
    }

    let bin = sdk.join("bin");
    runner.run(
        &CommandSpec::program_path(&bin.join("sdkmanager"))
            .args(SDK_PACKAGES)
            .current_dir(&bin)
            .stdin("y\n"),
    )?;

    if let Some(toolchains) = sdk.parent() {
        for entry in MISPLACED_SDK_ENTRIES {
            let from = toolchains.join(entry);
            let to = sdk.join(entry);
            log.best_effort("move sdk entry", &from, fs::rename(&from, &to));
        }
    }
    Ok(true)
}

fn read_version(marker: &Path) -> Option<String> {
    fs::read_to_string(marker)
        .ok()
        .map(|v| v.trim().to_string())
}
