use super::{LockError, LockGuard};
use crate::log::{Event, LogContext};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Report a waiting process once it has been blocked this long
const PATIENCE: Duration = Duration::from_secs(2);

/// Sleep schedule between lock attempts: doubles from 10ms, capped at 500ms
struct Backoff {
    next: Duration,
}

impl Backoff {
    const FIRST: Duration = Duration::from_millis(10);
    const CAP: Duration = Duration::from_millis(500);

    fn new() -> Self {
        Self { next: Self::FIRST }
    }

    fn wait(&mut self) {
        std::thread::sleep(self.next);
        self.next = (self.next * 2).min(Self::CAP);
    }
}

fn open_lock_file(lock_path: &Path) -> Result<File, LockError> {
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent).map_err(LockError::io("create directory for", lock_path))?;
    }
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(LockError::io("open", lock_path))
}

/// Another process holds the lock; every other failure is a real error
fn held_elsewhere(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Polls `try_lock_exclusive` until it succeeds or `timeout` expires.
/// `None` waits forever.
pub(crate) fn acquire_with_retry(
    lock_path: &Path,
    timeout: Option<Duration>,
    description: &str,
    log: &LogContext,
) -> Result<LockGuard, LockError> {
    let file = open_lock_file(lock_path)?;
    let started = Instant::now();
    let mut backoff = Backoff::new();
    let mut announced = false;

    while let Err(e) = file.try_lock_exclusive() {
        if !held_elsewhere(&e) {
            return Err(LockError::io("lock", lock_path)(e));
        }

        let waited = started.elapsed();
        if timeout.is_some_and(|limit| waited >= limit) {
            return Err(LockError::Timeout {
                path: lock_path.to_path_buf(),
                description: description.to_string(),
                waited,
            });
        }
        if !announced && waited >= PATIENCE {
            log.emit(Event::LockWaiting {
                path: lock_path,
                description,
            });
            announced = true;
        }
        backoff.wait();
    }

    log.emit(Event::LockAcquired {
        path: lock_path,
        description,
    });
    Ok(LockGuard::new(file, lock_path.to_path_buf(), log.clone()))
}
