//! Archive extraction
//!
//! Entries that would land outside the destination are skipped: tar entries
//! go through `unpack_in`, zip entries through `enclosed_name`.

use super::InstallError;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    TarXz,
    Zip,
}

impl ArchiveFormat {
    /// Detects the format from the URL, ignoring any query string
    pub fn from_url(url: &str) -> Option<Self> {
        let path = match url::Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
        };
        if path.ends_with(".tar.gz") || path.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else if path.ends_with(".tar.xz") {
            Some(ArchiveFormat::TarXz)
        } else if path.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else {
            None
        }
    }

    fn name(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::TarXz => "tar.xz",
            ArchiveFormat::Zip => "zip",
        }
    }
}

pub fn extract(archive: &Path, format: ArchiveFormat, dest: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dest)
        .map_err(|e| InstallError::io(format!("create {}", dest.display()), e))?;
    let file = fs::File::open(archive)
        .map_err(|e| InstallError::io(format!("open archive {}", archive.display()), e))?;

    match format {
        ArchiveFormat::TarGz => extract_tar(flate2::read::GzDecoder::new(file), dest, format),
        ArchiveFormat::TarXz => extract_tar(xz2::read::XzDecoder::new(file), dest, format),
        ArchiveFormat::Zip => extract_zip(file, dest),
    }
}

fn extract_tar<R: Read>(reader: R, dest: &Path, format: ArchiveFormat) -> Result<(), InstallError> {
    let failed = |e: io::Error| InstallError::Extraction {
        format: format.name(),
        reason: e.to_string(),
    };

    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries().map_err(failed)? {
        let mut entry = entry.map_err(failed)?;
        entry.unpack_in(dest).map_err(failed)?;
    }
    Ok(())
}

fn extract_zip(file: fs::File, dest: &Path) -> Result<(), InstallError> {
    let failed = |e: zip::result::ZipError| InstallError::Extraction {
        format: "zip",
        reason: e.to_string(),
    };

    let mut archive = zip::ZipArchive::new(file).map_err(failed)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(failed)?;
        let Some(outpath) = entry.enclosed_name().map(|p| dest.join(p)) else {
            continue;
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| InstallError::io(format!("create {}", outpath.display()), e))?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| InstallError::io(format!("create {}", parent.display()), e))?;
        }
        let mut outfile = fs::File::create(&outpath)
            .map_err(|e| InstallError::io(format!("create {}", outpath.display()), e))?;
        io::copy(&mut entry, &mut outfile)
            .map_err(|e| InstallError::io(format!("extract {}", outpath.display()), e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&outpath, fs::Permissions::from_mode(mode)).map_err(|e| {
                InstallError::io(format!("set permissions on {}", outpath.display()), e)
            })?;
        }
    }
    Ok(())
}
