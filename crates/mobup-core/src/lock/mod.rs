//! Cross-process mutual exclusion
//!
//! Two advisory locks (fs2) serialize concurrent `mobup` invocations:
//!
//! - `<home>/toolchain.lock` guards everything under `<home>/toolchains` and
//!   the shared bind-tool preparation.
//! - `<home>/<project>/project.lock` guards one project's workspace, its
//!   compile step and its build cache.
//!
//! The toolchain lock is always released before the project lock is taken,
//! so the two are never held together.

use crate::log::LogContext;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod acquire;
mod error;
mod guard;

pub use error::LockError;
pub use guard::LockGuard;


pub const TOOLCHAIN_LOCK_FILE: &str = "toolchain.lock";
pub const PROJECT_LOCK_FILE: &str = "project.lock";

/// Acquires an exclusive lock on `lock_path`.
///
/// Blocks until the lock is free when `timeout` is `None`; otherwise fails
/// with [`LockError::Timeout`] once the wait exceeds it.
///
/// ```no_run
/// use mobup_core::lock::acquire_lock;
/// use mobup_core::log::LogContext;
/// use std::path::Path;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let log = LogContext::default();
/// let guard = acquire_lock(Path::new("/tmp/my.lock"), Some(Duration::from_secs(30)), "demo", &log)?;
/// guard.release()?;
/// # Ok(())
/// # }
/// ```
pub fn acquire_lock(
    lock_path: &Path,
    timeout: Option<Duration>,
    description: &str,
    log: &LogContext,
) -> Result<LockGuard, LockError> {
    acquire::acquire_with_retry(lock_path, timeout, description, log)
}

/// Knows where the home and project locks live
#[derive(Debug, Clone)]
pub struct LockCoordinator {
    home: PathBuf,
    timeout: Option<Duration>,
    log: LogContext,
}

impl LockCoordinator {
    pub fn new(home: impl Into<PathBuf>, timeout: Option<Duration>, log: LogContext) -> Self {
        Self {
            home: home.into(),
            timeout,
            log,
        }
    }

    pub fn toolchain_lock_path(&self) -> PathBuf {
        self.home.join(TOOLCHAIN_LOCK_FILE)
    }

    pub fn project_lock_path(&self, project: &str) -> PathBuf {
        self.home.join(project).join(PROJECT_LOCK_FILE)
    }

    pub fn lock_toolchains(&self) -> Result<LockGuard, LockError> {
        acquire_lock(
            &self.toolchain_lock_path(),
            self.timeout,
            "toolchains",
            &self.log,
        )
    }

    pub fn lock_project(&self, project: &str) -> Result<LockGuard, LockError> {
        acquire_lock(
            &self.project_lock_path(project),
            self.timeout,
            project,
            &self.log,
        )
    }
}
