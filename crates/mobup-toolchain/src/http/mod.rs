mod client;
mod download;

pub use client::Purpose;
pub use download::{DownloadError, download_to_file};
