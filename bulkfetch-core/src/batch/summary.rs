use std::path::{Path, PathBuf};

use bulkfetch_common::hashing::file_md5;
use log::debug;
use serde::Serialize;
use tokio::{fs::File as AsyncFile, io::AsyncWriteExt};

use crate::error::TransferError;
use crate::request::ResolvedTransfer;

/// The classified result of one transfer attempt.
#[derive(Debug)]
pub struct TransferOutcome {
    pub source: String,
    pub destination_path: PathBuf,
    /// Bytes written on success, the captured error otherwise.
    pub result: Result<u64, TransferError>,
}

impl TransferOutcome {
    pub(crate) fn new(transfer: ResolvedTransfer, result: Result<u64, TransferError>) -> Self {
        Self {
            source: transfer.source,
            destination_path: transfer.destination_path,
            result,
        }
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Bytes written, `None` for failed transfers.
    #[inline]
    pub fn bytes(&self) -> Option<u64> {
        self.result.as_ref().ok().copied()
    }

    #[inline]
    pub fn error(&self) -> Option<&TransferError> {
        self.result.as_ref().err()
    }
}

/// Outcomes of a whole batch, split by success in submission order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: Vec<TransferOutcome>,
    pub failed: Vec<TransferOutcome>,
}

impl BatchResult {
    /// Stable partition of `outcomes` on their result variant.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = TransferOutcome>) -> Self {
        let (succeeded, failed) = outcomes.into_iter().partition(TransferOutcome::is_success);
        Self { succeeded, failed }
    }

    /// Number of attempted transfers.
    #[inline]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Sum of bytes written by the successful transfers.
    pub fn total_bytes(&self) -> u64 {
        self.succeeded.iter().filter_map(TransferOutcome::bytes).sum()
    }

    /// Writes a pretty-printed JSON report of every outcome to `path`.
    ///
    /// With `with_checksums` the MD5 of every downloaded file is included. A file that can
    /// no longer be read gets no checksum rather than failing the report.
    pub async fn write_report(&self, path: &Path, with_checksums: bool) -> Result<(), std::io::Error> {
        let mut entries = Vec::with_capacity(self.len());

        for outcome in &self.succeeded {
            let md5 = if with_checksums {
                match file_md5(&outcome.destination_path).await {
                    Ok(hash) => Some(hash),
                    Err(error) => {
                        debug!(
                            "Could not hash {}: {}",
                            outcome.destination_path.display(),
                            error
                        );
                        None
                    }
                }
            } else {
                None
            };
            entries.push(ReportEntry::from_outcome(outcome, md5));
        }

        entries.extend(
            self.failed
                .iter()
                .map(|outcome| ReportEntry::from_outcome(outcome, None)),
        );

        let report = Report {
            total_bytes: self.total_bytes(),
            succeeded: self.succeeded.len(),
            failed: self.failed.len(),
            transfers: entries,
        };

        let serialized = serde_json::to_string_pretty(&report)?;
        let mut file = AsyncFile::create(path).await?;
        file.write_all(serialized.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    total_bytes: u64,
    succeeded: usize,
    failed: usize,
    transfers: Vec<ReportEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ReportEntry<'a> {
    source: &'a str,
    destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    md5: Option<String>,
}

impl<'a> ReportEntry<'a> {
    fn from_outcome(outcome: &'a TransferOutcome, md5: Option<String>) -> Self {
        Self {
            source: &outcome.source,
            destination: outcome.destination_path.display().to_string(),
            bytes: outcome.bytes(),
            error: outcome.error().map(ToString::to_string),
            md5,
        }
    }
}
