mod cli;
mod commands;
mod context;

use clap::Parser;
use cli::Cli;
use context::Context;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = Context::new(&cli).and_then(|ctx| {
        if cli.reset {
            commands::clean::reset(&ctx)?;
        }
        if cli.clean {
            commands::clean::run(&ctx)
        } else {
            commands::build::run(&ctx)
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
