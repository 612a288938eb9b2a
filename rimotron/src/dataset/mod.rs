//! Downloading and verifying the raw dictionaries.
//!
//! A descriptor file maps dataset names to where they come from and where
//! they go:
//!
//! ```json
//! { "lexique": { "url": "http://...", "path": "Lexique383.tsv", "sha256": "..." } }
//! ```
//!
//! `sha256` and `md5` are both understood; every one given is checked. Any
//! other key is rejected so that a checksum is never silently ignored.
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use md5::Md5;
use sha2::{Digest, Sha256};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// Reading, writing or moving a dataset file failed
    #[error("{0}: {1}")]
    Io(String, #[source] io::Error),

    /// The descriptor file is not valid
    #[error("Invalid dataset descriptor: {0}")]
    Json(#[from] serde_json::Error),

    /// The download itself failed
    #[error("Download of {0} failed: {1}")]
    Http(String, String),

    /// The file on disk does not have the expected checksum
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A download is needed but the crate was built without `fetch`
    #[error("{0} must be downloaded, rebuild with the `fetch` feature")]
    FetchDisabled(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetDescriptor {
    pub url: String,
    /// Relative to the destination directory
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

impl DatasetDescriptor {
    pub fn has_checksum(&self) -> bool {
        self.sha256.is_some() || self.md5.is_some()
    }
}

/// What [`ensure_dataset`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetStatus {
    /// Present with the expected checksum
    UpToDate,
    /// Present, and the descriptor has no checksum to compare against
    Unverified,
    /// Fetched and, if a checksum is known, verified
    Downloaded,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> DatasetError + '_ {
    move |e| DatasetError::Io(path.display().to_string(), e)
}

pub fn load_descriptors<P: AsRef<Path>>(
    path: P,
) -> Result<BTreeMap<String, DatasetDescriptor>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_error(path))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn digest_file<D: Digest>(path: &Path) -> Result<String, DatasetError> {
    let mut file = File::open(path).map_err(io_error(path))?;
    let mut hasher = D::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = file.read(&mut buf).map_err(io_error(path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hex-encoded SHA-256 of the file content.
pub fn sha256_file(path: &Path) -> Result<String, DatasetError> {
    digest_file::<Sha256>(path)
}

/// Hex-encoded MD5 of the file content.
pub fn md5_file(path: &Path) -> Result<String, DatasetError> {
    digest_file::<Md5>(path)
}

fn compare(path: &Path, expected: &str, actual: String) -> Result<(), DatasetError> {
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(DatasetError::Integrity {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Checks every checksum the descriptor carries against `path`.
fn verify(descriptor: &DatasetDescriptor, path: &Path) -> Result<(), DatasetError> {
    if let Some(expected) = &descriptor.sha256 {
        compare(path, expected, sha256_file(path)?)?;
    }
    if let Some(expected) = &descriptor.md5 {
        compare(path, expected, md5_file(path)?)?;
    }
    Ok(())
}

/// Makes sure the dataset is present under `root`, downloading it when it
/// is missing or its checksum does not match.
pub fn ensure_dataset(
    descriptor: &DatasetDescriptor,
    root: &Path,
) -> Result<DatasetStatus, DatasetError> {
    let dest = root.join(&descriptor.path);

    if dest.exists() {
        if !descriptor.has_checksum() {
            log::info!("{} present, no checksum to verify", dest.display());
            return Ok(DatasetStatus::Unverified);
        }

        match verify(descriptor, &dest) {
            Ok(()) => {
                log::info!("{} already up to date", dest.display());
                return Ok(DatasetStatus::UpToDate);
            }
            Err(DatasetError::Integrity { .. }) => {
                log::warn!("Checksum mismatch for {}, downloading again", dest.display());
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    log::info!("Downloading {} to {}", descriptor.url, dest.display());
    download(&descriptor.url, &dest)?;

    verify(descriptor, &dest)?;
    Ok(DatasetStatus::Downloaded)
}

/// Streams `url` into a temporary file next to `dest`, then moves it into
/// place so that an interrupted download never leaves a partial file.
#[cfg(feature = "fetch")]
fn download(url: &str, dest: &Path) -> Result<(), DatasetError> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_error(dir))?;

    let http_error = |e: reqwest::Error| DatasetError::Http(url.to_string(), e.to_string());
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(http_error)?;
    response.copy_to(tmp.as_file_mut()).map_err(http_error)?;

    tmp.persist(dest)
        .map_err(|e| DatasetError::Io(dest.display().to_string(), e.error))?;
    Ok(())
}

#[cfg(not(feature = "fetch"))]
fn download(url: &str, _dest: &Path) -> Result<(), DatasetError> {
    Err(DatasetError::FetchDisabled(url.to_string()))
}
