//! Clean and reset commands

use crate::context::Context;
use anyhow::Result;
use colored::Colorize;
use mobup_core::fs::remove_dir_all_if_exists;
use mobup_core::log::Event;
use std::path::Path;

/// Deletes the project build directory
pub fn run(ctx: &Context) -> Result<()> {
    remove(ctx, &ctx.project_dir())?;
    println!("{} Cleaned {}", "✓".green().bold(), ctx.project());
    Ok(())
}

/// Deletes the whole home directory: toolchains, catalog and every project
pub fn reset(ctx: &Context) -> Result<()> {
    remove(ctx, ctx.home.root())?;
    println!(
        "{} Reset {}",
        "✓".green().bold(),
        ctx.home.root().display()
    );
    Ok(())
}

fn remove(ctx: &Context, path: &Path) -> Result<()> {
    ctx.log.emit(Event::Remove { path });
    remove_dir_all_if_exists(path)?;
    Ok(())
}
