use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Which side of the build a hash covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Input,
    Output,
}

impl HashKind {
    fn as_str(self) -> &'static str {
        match self {
            HashKind::Input => "in",
            HashKind::Output => "out",
        }
    }
}

/// One record per diagnostic call site.
///
/// Fields borrow from the caller; nothing is allocated unless the event is
/// actually enabled by the subscriber.
#[derive(Debug)]
pub enum Event<'a> {
    ConfigLoaded {
        path: &'a Path,
        project: &'a str,
    },
    CacheUnreadable {
        path: &'a Path,
        error: &'a str,
    },
    CacheStale,
    CacheFresh,
    CacheSaved {
        path: &'a Path,
    },
    Hashed {
        kind: HashKind,
        file: &'a Path,
    },
    HashComputed {
        kind: HashKind,
        hash: &'a str,
        files: usize,
    },
    CatalogRefresh {
        url: &'a str,
        file: &'a Path,
    },
    CatalogLoaded {
        file: &'a Path,
        entries: usize,
    },
    ToolchainPresent {
        resource: &'a str,
        path: &'a Path,
    },
    Download {
        url: &'a str,
        dst: &'a Path,
    },
    DownloadComplete {
        url: &'a str,
        bytes: u64,
    },
    Installed {
        resource: &'a str,
        path: &'a Path,
    },
    LockWaiting {
        path: &'a Path,
        description: &'a str,
    },
    LockAcquired {
        path: &'a Path,
        description: &'a str,
    },
    LockReleased {
        path: &'a Path,
    },
    Chdir {
        path: &'a Path,
    },
    SetEnv {
        key: &'a str,
        value: &'a str,
    },
    Exec {
        command: &'a str,
    },
    ExecOutput {
        line: &'a str,
        failed: bool,
    },
    ModuleFound {
        path: &'a Path,
        name: &'a str,
    },
    DependencySeen {
        module: &'a str,
        version: &'a str,
    },
    DependencyUpgraded {
        module: &'a str,
        version: &'a str,
    },
    Copy {
        from: &'a Path,
        to: &'a Path,
    },
    Move {
        from: &'a Path,
        to: &'a Path,
    },
    MoveSkipped {
        from: &'a Path,
        reason: &'a str,
    },
    Remove {
        path: &'a Path,
    },
    BestEffortFailed {
        operation: &'static str,
        path: &'a Path,
        error: &'a str,
    },
    PhaseDone {
        phase: &'static str,
        elapsed: Duration,
    },
}

impl Event<'_> {
    pub(crate) fn record(&self, component: &'static str) {
        match self {
            Event::ConfigLoaded { path, project } => {
                debug!(component, path = %path.display(), project, "build file loaded")
            }
            Event::CacheUnreadable { path, error } => {
                debug!(component, path = %path.display(), error, "build cache unreadable, rebuilding")
            }
            Event::CacheStale => debug!(component, "build cache indicates file changes"),
            Event::CacheFresh => debug!(component, "no need to build again"),
            Event::CacheSaved { path } => debug!(component, path = %path.display(), "build cache updated"),
            Event::Hashed { kind, file } => {
                trace!(component, kind = kind.as_str(), file = %file.display(), "artifact hashed")
            }
            Event::HashComputed { kind, hash, files } => {
                debug!(component, kind = kind.as_str(), hash, files, "hash computed")
            }
            Event::CatalogRefresh { url, file } => {
                info!(component, url, file = %file.display(), "refreshing resource catalog")
            }
            Event::CatalogLoaded { file, entries } => {
                debug!(component, file = %file.display(), entries, "resource catalog loaded")
            }
            Event::ToolchainPresent { resource, path } => {
                debug!(component, resource, path = %path.display(), "toolchain exists")
            }
            Event::Download { url, dst } => {
                info!(component, url, dst = %dst.display(), "downloading")
            }
            Event::DownloadComplete { url, bytes } => {
                debug!(component, url, bytes, "download completed")
            }
            Event::Installed { resource, path } => {
                info!(component, resource, path = %path.display(), "toolchain installed")
            }
            Event::LockWaiting { path, description } => {
                warn!(component, path = %path.display(), description, "waiting for lock")
            }
            Event::LockAcquired { path, description } => {
                debug!(component, path = %path.display(), description, "lock acquired")
            }
            Event::LockReleased { path } => {
                debug!(component, path = %path.display(), "lock released")
            }
            Event::Chdir { path } => debug!(component, cd = %path.display()),
            Event::SetEnv { key, value } => debug!(component, key, value, "export"),
            Event::Exec { command } => debug!(component, exec = command),
            Event::ExecOutput { line, failed } => {
                if *failed {
                    warn!(component, "{}", line)
                } else {
                    debug!(component, "{}", line)
                }
            }
            Event::ModuleFound { path, name } => {
                debug!(component, path = %path.display(), name, "processing module")
            }
            Event::DependencySeen { module, version } => {
                debug!(component, module, version, "found")
            }
            Event::DependencyUpgraded { module, version } => {
                debug!(component, module, version, "upgrade")
            }
            Event::Copy { from, to } => {
                debug!(component, from = %from.display(), to = %to.display(), "copy")
            }
            Event::Move { from, to } => {
                debug!(component, from = %from.display(), to = %to.display(), "move")
            }
            Event::MoveSkipped { from, reason } => {
                debug!(component, from = %from.display(), reason, "move skipped")
            }
            Event::Remove { path } => debug!(component, path = %path.display(), "remove"),
            Event::BestEffortFailed {
                operation,
                path,
                error,
            } => debug!(component, operation, path = %path.display(), error, "best-effort step failed"),
            Event::PhaseDone { phase, elapsed } => {
                info!(component, phase, elapsed_ms = elapsed.as_millis() as u64, "done")
            }
        }
    }
}
