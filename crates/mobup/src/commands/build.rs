//! Build command: provision toolchains, assemble the workspace and bind

use crate::context::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use mobup_core::exec::{CommandSpec, Environment, ProcessRunner};
use mobup_core::lock::LockCoordinator;
use mobup_toolchain::bind::bind_all;
use mobup_toolchain::catalog::{ResourceCatalog, load_or_refresh};
use mobup_toolchain::mobile::{prepare_android_sdk, prepare_gomobile};
use mobup_toolchain::{Platform, Provisioner, ToolchainLayout, provision_toolchains};
use mobup_workspace::{DependencyMerger, GoModTool};
use std::fs;
use std::time::Instant;

pub fn run(ctx: &Context) -> Result<()> {
    let cache = ctx.build_cache();
    if !cache.is_build_required()? {
        println!("{} {} is up to date", "✓".green().bold(), ctx.project());
        return Ok(());
    }

    let env = Environment::inherit(&ctx.build.variables);
    run_before_scripts(ctx, &ProcessRunner::new(env.clone(), ctx.log.scoped("script")))?;

    let Some(gomobile) = ctx.build.gomobile() else {
        println!(
            "{} {} has no gomobile build section, nothing to bind",
            "→".cyan(),
            ctx.project()
        );
        return Ok(());
    };

    let started = Instant::now();
    let catalog = load_or_refresh(
        &ctx.home.catalog_file(),
        &ctx.resources,
        &ctx.log.scoped("catalog"),
    )?;
    let locks = LockCoordinator::new(ctx.home.root(), ctx.lock_timeout, ctx.log.scoped("lock"));

    let guard = locks.lock_toolchains()?;
    let (layout, runner) = prepare_toolchains(ctx, &catalog, env)?;
    guard.release()?;
    ctx.log.phase_done("toolchains", started);

    let started = Instant::now();
    let guard = locks.lock_project(ctx.project())?;

    let tool = GoModTool::new(layout.go_binary(), runner.clone());
    DependencyMerger::new(
        ctx.workspace_dir(),
        ctx.base_dir.clone(),
        &tool,
        ctx.log.scoped("workspace"),
    )
    .merge(&gomobile.modules)
    .context("failed to assemble the module workspace")?;

    for output in ctx.outputs() {
        if let Some(parent) = output.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    bind_all(&ctx.build, &ctx.targets, &ctx.base_dir, &layout, &runner)?;
    cache.update()?;

    guard.release()?;
    ctx.log.phase_done("bind", started);

    for target in &ctx.targets {
        println!(
            "{} Built {} for {}",
            "✓".green().bold(),
            ctx.project(),
            target.as_str()
        );
    }
    Ok(())
}

fn run_before_scripts(ctx: &Context, runner: &ProcessRunner) -> Result<()> {
    for script in &ctx.build.before_script {
        runner
            .run(&CommandSpec::shell(script.as_str()).current_dir(ctx.base_dir.to_path_buf()))
            .with_context(|| format!("before_script '{script}' failed"))?;
    }
    Ok(())
}

/// Installs the pinned toolchains and prepares gomobile and the Android SDK.
/// Must run under the toolchain lock.
fn prepare_toolchains(
    ctx: &Context,
    catalog: &ResourceCatalog,
    mut env: Environment,
) -> Result<(ToolchainLayout, ProcessRunner)> {
    let platform = Platform::current();
    let provisioner = Provisioner::new(ctx.home.toolchains_dir(), ctx.log.scoped("install"))?;
    let set = provision_toolchains(&provisioner, catalog, &ctx.build.pins(), &platform)?;

    let layout = ToolchainLayout::new(&set, &ctx.workspace_dir(), &platform);
    let vars = layout.variables(env.get("PATH"), dirs::home_dir().as_deref())?;
    env.extend(vars);
    env.log(&ctx.log.scoped("env"));

    let runner = ProcessRunner::new(env, ctx.log.scoped("exec"));
    prepare_gomobile(&layout, &runner).context("failed to prepare gomobile")?;
    prepare_android_sdk(&layout, &runner, &ctx.log.scoped("sdk"))
        .context("failed to prepare the Android SDK")?;
    Ok((layout, runner))
}
