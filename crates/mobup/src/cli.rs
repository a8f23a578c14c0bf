//! CLI argument structure using clap

use clap::{ArgAction, Parser, ValueEnum};
use mobup_core::config::consts::{DEFAULT_BUILD_FILE, home};
use mobup_toolchain::catalog::DEFAULT_CATALOG_URL;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "mobup")]
#[command(version, about = "Reproducible gomobile builds for Go modules", long_about = None)]
pub struct Cli {
    /// Base directory; relative paths in the build file resolve against it
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Build file, resolved against --dir
    #[arg(long, value_name = "PATH", default_value_t = format!("./{DEFAULT_BUILD_FILE}"))]
    pub build_file: String,

    /// Home directory for toolchains and project workspaces [default: ~/.mobup]
    #[arg(long, value_name = "PATH", env = home::ENV_VAR)]
    pub home: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Explicit log level; overrides -v
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// URL of the resource catalog
    #[arg(long, value_name = "URL", default_value = DEFAULT_CATALOG_URL)]
    pub resources: Url,

    /// Colon separated targets: all, gomobile/android, gomobile/ios
    #[arg(long, value_name = "T1:T2", default_value = "all")]
    pub targets: String,

    /// Delete the project build directory and exit
    #[arg(long)]
    pub clean: bool,

    /// Delete the whole home directory before building
    #[arg(long)]
    pub reset: bool,

    /// Give up waiting for a lock after this many seconds
    #[arg(long, value_name = "SECS")]
    pub lock_timeout: Option<u64>,
}

impl Cli {
    pub fn target_names(&self) -> Vec<&str> {
        self.targets
            .split(':')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout.map(Duration::from_secs)
    }

    /// Filter directive for the tracing subscriber
    pub fn log_filter(&self) -> &'static str {
        if let Some(level) = self.log_level {
            return level.as_filter();
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
