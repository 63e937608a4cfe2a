//! Turning raw user input into the ordered, de-duplicated list of transfers of a batch.
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use bulkfetch_common::file_ops::{get_basename, is_file};
use log::debug;

use crate::error::InvalidRequestError;
use crate::progress::{LogType, ProgressListener};

/// One URL to download, optionally with the name it should be saved as.
///
/// Built from a bare URL or from a `(url, name)` pair:
///
/// ```
/// use bulkfetch_core::DownloadRequest;
///
/// let plain = DownloadRequest::from("https://example.com/a.bin");
/// let named = DownloadRequest::from(("https://example.com/a.bin", "b.bin"));
///
/// assert_eq!(plain.destination_name, None);
/// assert_eq!(named.destination_name.as_deref(), Some("b.bin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source: String,
    pub destination_name: Option<String>,
}

impl DownloadRequest {
    pub fn new(source: impl Into<String>, destination_name: Option<String>) -> Self {
        Self {
            source: source.into(),
            destination_name,
        }
    }

    /// Trims the URL and the explicit name, deriving the name from the URL when absent.
    ///
    /// `index` is the position of the request in its batch and only feeds error messages.
    pub fn normalize(&self, index: usize) -> Result<(String, String), InvalidRequestError> {
        let url = self.source.trim();
        if url.is_empty() {
            return Err(InvalidRequestError::EmptyUrl { index });
        }

        let name = match &self.destination_name {
            Some(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(InvalidRequestError::EmptyFileName {
                        url: url.to_string(),
                    });
                }
                name
            }
            None => {
                let derived = get_basename(url);
                if derived.is_empty() {
                    return Err(InvalidRequestError::UnresolvableFileName {
                        url: url.to_string(),
                    });
                }
                derived
            }
        };

        Ok((url.to_string(), name.to_string()))
    }
}

impl From<&str> for DownloadRequest {
    fn from(source: &str) -> Self {
        Self::new(source, None)
    }
}

impl From<String> for DownloadRequest {
    fn from(source: String) -> Self {
        Self::new(source, None)
    }
}

impl From<(&str, &str)> for DownloadRequest {
    fn from((source, name): (&str, &str)) -> Self {
        Self::new(source, Some(name.to_string()))
    }
}

impl From<(String, String)> for DownloadRequest {
    fn from((source, name): (String, String)) -> Self {
        Self::new(source, Some(name))
    }
}

impl From<(String, Option<String>)> for DownloadRequest {
    fn from((source, name): (String, Option<String>)) -> Self {
        Self::new(source, name)
    }
}

impl From<(&str, Option<&str>)> for DownloadRequest {
    fn from((source, name): (&str, Option<&str>)) -> Self {
        Self::new(source, name.map(str::to_string))
    }
}

/// A request bound to its final location on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedTransfer {
    pub source: String,
    pub destination_path: PathBuf,
}

/// Validates every request, failing on the first malformed one.
///
/// Returns `(url, file name)` pairs in input order. Touches nothing on disk.
pub fn normalize_requests(
    requests: &[DownloadRequest],
) -> Result<Vec<(String, String)>, InvalidRequestError> {
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| request.normalize(index))
        .collect()
}

/// Binds normalized requests to `download_dir`, skipping files already on disk when
/// `replace_existing` is false and collapsing duplicate `(url, path)` pairs.
///
/// The first occurrence of a duplicate wins and input order is kept. Every skipped file is
/// reported to `progress_listener` as [`LogType::Skip`].
pub fn resolve_transfers(
    normalized: Vec<(String, String)>,
    download_dir: &Path,
    replace_existing: bool,
    progress_listener: &dyn ProgressListener,
) -> Vec<ResolvedTransfer> {
    let mut seen = AHashSet::with_capacity(normalized.len());
    let mut transfers = Vec::with_capacity(normalized.len());

    for (source, name) in normalized {
        let destination_path = download_dir.join(name);

        if !replace_existing && is_file(&destination_path) {
            debug!(
                "{} already exists, skipping {}",
                destination_path.display(),
                source
            );
            progress_listener.log_event(
                LogType::Skip,
                &destination_path.display().to_string(),
                "already exists.",
            );
            continue;
        }

        let transfer = ResolvedTransfer {
            source,
            destination_path,
        };

        if seen.insert(transfer.clone()) {
            transfers.push(transfer);
        } else {
            debug!("Dropping duplicate transfer of {}", transfer.source);
        }
    }

    transfers
}
