use crate::lock::LockError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MobupError {
    // Configuration errors
    #[error("CONFIG_ERROR: {0}")]
    ConfigError(String),

    // Toolchain errors
    #[error("RESOURCE_NOT_FOUND: no such resource: {name}@{version} for os={os} and arch={arch}")]
    ResourceNotFound {
        name: String,
        version: String,
        os: String,
        arch: String,
    },

    #[error("PROVISIONING_FAILED: failed to provide resource {resource}: {reason}")]
    ProvisioningFailed { resource: String, reason: String },

    // Workspace errors
    #[error("NOT_A_MODULE: expected '{path}' to contain a go.mod with a module declaration: {reason}")]
    NotAModule { path: PathBuf, reason: String },

    // Process errors
    #[error("SUBPROCESS_FAILED: `{command}` exited with {status}\n{output}")]
    SubprocessFailed {
        command: String,
        status: String,
        output: String,
    },

    // Lock errors
    #[error("LOCK_FAILED: {0}")]
    LockFailed(#[from] LockError),

    // Cache errors
    #[error("CACHE_UNREADABLE: {0}")]
    CacheUnreadable(String),

    // Network errors
    #[error("NETWORK_FETCH_FAILED: {0}")]
    Network(String),

    // IO errors
    #[error("IO_ERROR: failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl MobupError {
    /// Wraps an I/O error together with a short description of what was attempted
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        MobupError::Io {
            operation: operation.into(),
            source,
        }
    }
}

impl From<std::io::Error> for MobupError {
    fn from(err: std::io::Error) -> Self {
        MobupError::io("perform I/O", err)
    }
}

pub type Result<T> = std::result::Result<T, MobupError>;
