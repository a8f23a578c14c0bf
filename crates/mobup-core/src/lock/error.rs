use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("gave up on {description} lock {} after {}s", path.display(), waited.as_secs())]
    Timeout {
        path: PathBuf,
        description: String,
        waited: Duration,
    },

    #[error("cannot {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LockError {
    /// Adapter for `map_err` that records what was attempted on `path`
    pub(crate) fn io(
        operation: &'static str,
        path: &Path,
    ) -> impl FnOnce(std::io::Error) -> Self + use<> {
        let path = path.to_path_buf();
        move |source| LockError::Io {
            operation,
            path,
            source,
        }
    }
}
