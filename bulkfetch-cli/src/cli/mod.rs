use std::path::PathBuf;
use std::time::Duration;

use bulkfetch_core::batch::DEFAULT_CHUNK_SIZE;
use bulkfetch_core::client::ClientOptions;
use bulkfetch_core::BatchOptions;
use clap::Parser;

use crate::config::FileConfig;

pub mod extra;

/// Label of the aggregate progress bar when `--desc` is not given.
pub const DEFAULT_DESCRIPTION: &str = "Downloading files";

const DEFAULT_WORKERS: usize = 2;

#[derive(Parser, Debug)]
#[clap(name = "bulkfetch", author, version, about, long_about = None)]
pub struct Cli {
    /// URLs to download. Each file is named after the last segment of its URL
    pub urls: Vec<String>,

    /// Read requests from a file, one per line as `URL [FILE_NAME]`
    ///
    /// Blank lines and lines starting with `#` are ignored.
    #[clap(short, long, value_name = "FILE", help_heading = "INPUT")]
    pub input: Option<PathBuf>,

    /// Where to save files (If the path doesn't exist, it will be created.)
    ///
    /// Defaults to the `download_dir` of the config file or the current directory.
    #[clap(short = 'o', long, value_name = "PATH", help_heading = "SAVE")]
    pub output: Option<PathBuf>,

    /// Number of simultaneous downloads
    ///
    /// [max: 32]
    #[clap(
        short = 'd',
        value_name = "NUMBER",
        value_parser(clap::value_parser!(u8).range(1..=32)),
        help_heading = "DOWNLOAD"
    )]
    pub simultaneous_downloads: Option<u8>,

    /// Skip files that already exist in the destination instead of downloading them again
    #[clap(long, value_parser, default_value_t = false, help_heading = "SAVE")]
    pub no_replace: bool,

    /// Size in bytes of the pieces written to disk
    #[clap(long, value_name = "BYTES", value_parser(clap::value_parser!(u64).range(1..)), help_heading = "DOWNLOAD")]
    pub chunk_size: Option<u64>,

    /// Give up on a single file after this many seconds
    #[clap(long, value_name = "SECS", help_heading = "DOWNLOAD")]
    pub timeout: Option<u64>,

    /// Keep the progress bar of every finished file on screen
    #[clap(long, value_parser, default_value_t = false, help_heading = "DISPLAY")]
    pub leave: bool,

    /// Label of the overall progress bar
    #[clap(long, value_name = "TEXT", default_value = DEFAULT_DESCRIPTION, help_heading = "DISPLAY")]
    pub desc: String,

    /// Write a JSON report of every transfer to this file
    #[clap(long, value_name = "FILE", help_heading = "SAVE")]
    pub report: Option<PathBuf>,

    /// Include the MD5 of every downloaded file in the report
    #[clap(long, value_parser, default_value_t = false, requires = "report", help_heading = "SAVE")]
    pub checksums: bool,
}

impl Cli {
    /// Merges the command line with the config file into the options of one batch.
    ///
    /// Flags win over the file, the file wins over the built-in defaults.
    pub fn batch_options(&self, config: &FileConfig) -> Result<BatchOptions, std::io::Error> {
        let download_dir = match (&self.output, &config.download_dir) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => path.clone(),
            (None, None) => std::env::current_dir()?,
        };

        let max_workers = self
            .simultaneous_downloads
            .map(usize::from)
            .or(config.max_workers)
            .unwrap_or(DEFAULT_WORKERS);

        let replace_existing = if self.no_replace {
            false
        } else {
            config.replace_existing.unwrap_or(true)
        };

        Ok(BatchOptions {
            download_dir,
            replace_existing,
            max_workers,
        })
    }

    pub fn client_options(&self, config: &FileConfig) -> ClientOptions {
        ClientOptions {
            user_agent: config.user_agent.clone(),
            connect_timeout: config.connect_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn chunk_size(&self, config: &FileConfig) -> usize {
        self.chunk_size
            .and_then(|size| usize::try_from(size).ok())
            .or(config.chunk_size)
            .unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    pub fn transfer_timeout(&self, config: &FileConfig) -> Option<Duration> {
        self.timeout
            .or(config.timeout_secs)
            .map(Duration::from_secs)
    }
}
