use mobup_core::log::{Event, LogContext};
use reqwest::blocking::Client;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error downloading {url}: {source}")]
    HttpError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("I/O error writing {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl From<DownloadError> for mobup_core::MobupError {
    fn from(err: DownloadError) -> Self {
        mobup_core::MobupError::Network(err.to_string())
    }
}

/// Streams `url` into `dst`, replacing any previous file.
///
/// Returns the number of bytes written. A partially written file is left
/// behind on error; callers own the cleanup of `dst`.
pub fn download_to_file(
    client: &Client,
    url: &str,
    dst: &Path,
    log: &LogContext,
) -> Result<u64, DownloadError> {
    log.emit(Event::Download { url, dst });

    let mut response = client.get(url).send()?;
    if let Err(err) = response.error_for_status_ref() {
        return Err(DownloadError::HttpError {
            url: url.to_string(),
            source: err,
        });
    }

    let io_error = |source: std::io::Error| DownloadError::IoError {
        path: dst.display().to_string(),
        source,
    };

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut file = fs::File::create(dst).map_err(io_error)?;

    let mut downloaded: u64 = 0;
    let mut buffer = [0; 8192];
    loop {
        let bytes_read = response.read(&mut buffer).map_err(io_error)?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read]).map_err(io_error)?;
        downloaded += bytes_read as u64;
    }
    file.sync_all().map_err(io_error)?;

    log.emit(Event::DownloadComplete {
        url,
        bytes: downloaded,
    });
    Ok(downloaded)
}
