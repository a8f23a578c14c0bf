use crate::http::DownloadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to extract {format} archive: {reason}")]
    Extraction { format: &'static str, reason: String },

    #[error("no files in resource")]
    Empty,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        InstallError::Io {
            operation: operation.into(),
            source,
        }
    }
}
