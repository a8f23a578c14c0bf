//! `gomobile bind` invocation

use crate::env::ToolchainLayout;
use mobup_core::config::{BuildFile, Target};
use mobup_core::exec::{CommandSpec, ProcessRunner};
use mobup_core::path::SlashPath;
use mobup_core::Result;

/// Builds the bind command for one target.
///
/// Returns `None` when the build file does not configure `target`.
pub fn bind_command(
    build: &BuildFile,
    target: Target,
    base: &SlashPath,
    layout: &ToolchainLayout,
) -> Option<CommandSpec> {
    let gomobile = build.gomobile()?;
    let out = build.output_path(target, base);

    let options = match target {
        Target::Android => {
            let android = gomobile.android.as_ref()?;
            vec![("-javapkg", &android.javapkg), ("-ldflags", &android.ldflags)]
        }
        Target::Ios => {
            let ios = gomobile.ios.as_ref().filter(|ios| !ios.disabled)?;
            vec![
                ("-prefix", &ios.prefix),
                ("-bundleid", &ios.bundleid),
                ("-ldflags", &ios.ldflags),
            ]
        }
    };

    let mut spec = CommandSpec::program_path(&layout.gomobile_binary())
        .current_dir(&layout.gopath)
        .env("GO111MODULE", "off")
        .args(["bind", "-v", "-o"])
        .arg(out.to_string());
    for (name, value) in options {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            spec = spec.arg(name).arg(value);
        }
    }

    let target_flag = match target {
        Target::Android => "-target=android",
        Target::Ios => "-target=ios",
    };
    Some(spec.arg(target_flag).args(gomobile.export.iter().cloned()))
}

/// Runs `gomobile bind` for every target in order; the first failure aborts
pub fn bind_all(
    build: &BuildFile,
    targets: &[Target],
    base: &SlashPath,
    layout: &ToolchainLayout,
    runner: &ProcessRunner,
) -> Result<()> {
    for target in targets {
        if let Some(spec) = bind_command(build, *target, base, layout) {
            runner.run(&spec)?;
        }
    }
    Ok(())
}
