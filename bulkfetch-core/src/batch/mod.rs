//! Provides the bounded-concurrency batch downloader.
//!
//! This module contains the [`Downloader`](crate::batch::Downloader) struct, which is the
//! central component for running a batch: it validates and resolves the requests, runs
//! the transfers with at most `max_workers` in flight over one shared HTTP client,
//! reports progress via a `ProgressListener` and gathers every outcome into a
//! [`BatchResult`].

// Classified outcomes and the JSON report.
mod summary;

// Streaming a single body to disk.
mod transfer;

pub use summary::{BatchResult, TransferOutcome};

use crate::client::{ClientOptions, HttpClient, ReqwestClient};
use crate::error::{ConfigurationError, DownloaderError, TransferError};
use crate::progress::{no_op_progress_listener, MainTickGuard, SharedProgressListener};
use crate::request::{normalize_requests, resolve_transfers, DownloadRequest, ResolvedTransfer};
use bulkfetch_common::file_ops::create_dir;
use log::{debug, warn};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::spawn;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Size of the pieces a body is written to disk in, unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Per-call options of [`Downloader::download_files`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory the files are saved to. Created (with its parents) if missing.
    pub download_dir: PathBuf,
    /// If `false`, requests whose destination already holds a regular file are skipped
    /// and reported nowhere.
    pub replace_existing: bool,
    /// Maximum number of transfers in flight at any instant.
    pub max_workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("./"),
            replace_existing: true,
            max_workers: 2,
        }
    }
}

impl BatchOptions {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.download_dir.to_string_lossy().trim().is_empty() {
            return Err(ConfigurationError::EmptyDownloadDir);
        }

        if self.max_workers == 0 {
            return Err(ConfigurationError::InvalidWorkerCount {
                value: self.max_workers,
            });
        }

        Ok(())
    }
}

/// Runs batches of downloads over a shared HTTP client.
///
/// The client and the progress listener live as long as the `Downloader`; everything else
/// (requests, transfers, outcomes) belongs to a single [`download_files`](Self::download_files) call.
#[derive(Debug, Clone)]
pub struct Downloader {
    /// The HTTP capability shared by every transfer.
    client: Arc<dyn HttpClient>,
    /// A shared progress listener for reporting download progress.
    progress_listener: SharedProgressListener,
    /// Largest piece written to disk at once.
    chunk_size: usize,
    /// Upper bound for a single transfer, `None` for no limit.
    transfer_timeout: Option<Duration>,
}

impl Downloader {
    /// Set up a downloader backed by reqwest.
    ///
    /// A `custom_client` is used as is; otherwise one is built out of `options`.
    pub fn new(
        custom_client: Option<Client>,
        options: &ClientOptions,
        progress_listener: Option<SharedProgressListener>,
    ) -> Result<Self, DownloaderError> {
        let client = match custom_client {
            Some(cli) => ReqwestClient::from_client(cli),
            None => ReqwestClient::new(options)?,
        };

        Ok(Self::with_http_client(Arc::new(client), progress_listener))
    }

    /// Set up a downloader over any [`HttpClient`] implementation.
    pub fn with_http_client(
        client: Arc<dyn HttpClient>,
        progress_listener: Option<SharedProgressListener>,
    ) -> Self {
        Self {
            client,
            progress_listener: progress_listener.unwrap_or_else(no_op_progress_listener),
            chunk_size: DEFAULT_CHUNK_SIZE,
            transfer_timeout: None,
        }
    }

    /// Sets the largest piece written to disk at once. Zero is treated as one.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Bounds the duration of every single transfer.
    pub const fn transfer_timeout(mut self, limit: Option<Duration>) -> Self {
        self.transfer_timeout = limit;
        self
    }

    /// Downloads every request into `options.download_dir`.
    ///
    /// # Behavior
    /// All parameters and requests are validated before anything touches the disk or the
    /// network. The download directory is then created, requests whose file already exists
    /// are dropped (unless `replace_existing`), duplicates collapse, and the remaining
    /// transfers run with at most `max_workers` in flight.
    ///
    /// Individual transfer failures never fail the call; they are returned in
    /// [`BatchResult::failed`].
    ///
    /// # Errors
    /// * [`ConfigurationError`] for an empty request list, an empty directory or zero workers.
    /// * [`InvalidRequestError`](crate::error::InvalidRequestError) for an empty URL or
    ///   file name.
    /// * [`DownloaderError::DirCreationError`] when the directory cannot be created.
    pub async fn download_files<I, R>(
        &self,
        requests: I,
        options: &BatchOptions,
    ) -> Result<BatchResult, DownloaderError>
    where
        I: IntoIterator<Item = R>,
        R: Into<DownloadRequest>,
    {
        let requests: Vec<DownloadRequest> = requests.into_iter().map(Into::into).collect();

        if requests.is_empty() {
            return Err(ConfigurationError::NoRequests.into());
        }
        options.validate()?;

        let normalized = normalize_requests(&requests)?;

        let download_dir = match options.download_dir.to_str() {
            Some(dir) => PathBuf::from(dir.trim()),
            None => options.download_dir.clone(),
        };

        debug!("Target dir: {}", download_dir.display());
        if let Err(error) = create_dir(&download_dir) {
            return Err(DownloaderError::DirCreationError {
                message: error.to_string(),
            });
        }

        let transfers = resolve_transfers(
            normalized,
            &download_dir,
            options.replace_existing,
            self.progress_listener.as_ref(),
        );

        debug!(
            "Fetching {} files with {} simultaneous downloads",
            transfers.len(),
            options.max_workers
        );

        self.progress_listener.set_main_total(transfers.len() as u64);

        let gate = Arc::new(Semaphore::new(options.max_workers));

        // Dropping the pool aborts whatever is still queued or running.
        let task_pool: Vec<_> = transfers
            .into_iter()
            .map(|transfer| {
                let handle = self.spawn_transfer(transfer.clone(), gate.clone());
                (transfer, AbortOnDrop(handle))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(task_pool.len());
        for (transfer, mut task) in task_pool {
            let result = match (&mut task.0).await {
                Ok(result) => result,
                Err(join_error) => Err(TransferError::TaskFailed {
                    message: join_error.to_string(),
                }),
            };

            if let Err(error) = &result {
                warn!("Failed to download {}: {}", transfer.source, error);
            }

            outcomes.push(TransferOutcome::new(transfer, result));
        }

        self.progress_listener.main_done();

        Ok(BatchResult::from_outcomes(outcomes))
    }

    /// Spawns one transfer that waits for a slot of `gate` before touching the network.
    fn spawn_transfer(
        &self,
        transfer: ResolvedTransfer,
        gate: Arc<Semaphore>,
    ) -> JoinHandle<Result<u64, TransferError>> {
        let client = self.client.clone();
        let progress_listener = self.progress_listener.clone();
        let chunk_size = self.chunk_size;
        let transfer_timeout = self.transfer_timeout;

        spawn(async move {
            // Ticks the main progress however this task ends, panics included.
            let _tick = MainTickGuard(progress_listener.clone());

            let Ok(_permit) = gate.acquire_owned().await else {
                return Err(TransferError::TaskFailed {
                    message: String::from("concurrency gate closed"),
                });
            };

            transfer::run_transfer(
                client.as_ref(),
                &transfer,
                chunk_size,
                transfer_timeout,
                &progress_listener,
            )
            .await
        })
    }
}

/// Aborts the wrapped task when dropped, so no transfer outlives its batch call.
struct AbortOnDrop(JoinHandle<Result<u64, TransferError>>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Downloads `requests` with a default reqwest client and no progress reporting.
///
/// Shorthand for [`Downloader::new`] followed by [`Downloader::download_files`].
pub async fn download_files<I, R>(
    requests: I,
    options: &BatchOptions,
) -> Result<BatchResult, DownloaderError>
where
    I: IntoIterator<Item = R>,
    R: Into<DownloadRequest>,
{
    Downloader::new(None, &ClientOptions::default(), None)?
        .download_files(requests, options)
        .await
}
