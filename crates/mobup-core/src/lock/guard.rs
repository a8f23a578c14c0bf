use super::LockError;
use crate::log::{Event, LogContext};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Held exclusive lock on a lock file.
///
/// [`LockGuard::release`] unlocks immediately and reports unlock failures.
/// Dropping an unreleased guard unlocks as well; closing the descriptor is
/// enough for fs2 advisory locks, the explicit unlock only makes the release
/// visible in the log.
#[derive(Debug)]
pub struct LockGuard {
    file: Option<File>,
    path: PathBuf,
    log: LogContext,
}

impl LockGuard {
    pub(crate) fn new(file: File, path: PathBuf, log: LogContext) -> Self {
        Self {
            file: Some(file),
            path,
            log,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(mut self) -> Result<(), LockError> {
        self.unlock()
    }

    fn unlock(&mut self) -> Result<(), LockError> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        FileExt::unlock(&file).map_err(LockError::io("unlock", &self.path))?;
        self.log.emit(Event::LockReleased { path: &self.path });
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let path = self.path.clone();
        let result = self.unlock();
        self.log.best_effort("release lock", &path, result);
    }
}
