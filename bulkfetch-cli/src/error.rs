use std::io;

use bulkfetch_core::error::DownloaderError;
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to parse config file {file}: {message}")]
    ConfigParseFail { file: String, message: String },

    #[error("Invalid request on line {line} of {file}")]
    MalformedInputLine { file: String, line: usize },

    #[error("No URLs given. Pass them as arguments or with --input")]
    NoRequestsInInput,

    #[error(transparent)]
    DownloadFail {
        #[from]
        source: DownloaderError,
    },
}
