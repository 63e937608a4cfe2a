use std::io;

use thiserror::Error;

/// Invalid call-time parameters. Raised before any I/O happens.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No download requests given")]
    NoRequests,

    #[error("Download directory cannot be empty")]
    EmptyDownloadDir,

    #[error("Number of simultaneous downloads must be a positive integer (got {value})")]
    InvalidWorkerCount { value: usize },
}

/// A malformed individual request. One bad request aborts the whole batch.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidRequestError {
    #[error("URL of request #{index} is empty")]
    EmptyUrl { index: usize },

    #[error("Explicit file name for {url} is empty")]
    EmptyFileName { url: String },

    #[error("Could not derive a file name from {url}")]
    UnresolvableFileName { url: String },
}

/// Failure of a single transfer. Always captured inside its
/// [`TransferOutcome`](crate::batch::TransferOutcome), never returned from a batch call.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("could not access {url}")]
    RemoteStatus { url: String, status: u16 },

    #[error("Failed to connect to download URL: {source}")]
    ConnectionFail {
        #[from]
        source: reqwest::Error,
    },

    #[error("Error while fetching chunk: {message}")]
    ChunkDownloadFail { message: String },

    #[error("Failed to write file: {source}")]
    FileIOError {
        #[from]
        source: io::Error,
    },

    #[error("Transfer of {url} timed out")]
    Timeout { url: String },

    #[error("Download task failed to execute: {message}")]
    TaskFailed { message: String },
}

impl TransferError {
    /// HTTP status of a rejected request, if that is what failed.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that make a whole batch call fail.
#[derive(Error, Debug)]
pub enum DownloaderError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    #[error("Failed to create destination directory. error: {message}")]
    DirCreationError { message: String },

    #[error("Failed to set up the HTTP client: {source}")]
    ClientInit {
        #[from]
        source: reqwest::Error,
    },
}
