//! # bulkfetch-core
//!
//! Download engine behind `bulkfetch`: takes a list of URLs (optionally paired with file
//! names), resolves them against a download directory and fetches them with a bounded
//! number of simultaneous transfers, streaming every body straight to disk.
//!
//! ```no_run
//! use bulkfetch_core::{download_files, BatchOptions};
//!
//! # async fn run() -> Result<(), bulkfetch_core::error::DownloaderError> {
//! let options = BatchOptions {
//!     download_dir: "downloads".into(),
//!     replace_existing: false,
//!     max_workers: 4,
//! };
//!
//! let result = download_files(
//!     [
//!         ("https://example.com/data/a.bin", None),
//!         ("https://example.com/data/b.bin", Some("renamed.bin")),
//!     ],
//!     &options,
//! )
//! .await?;
//!
//! for failed in &result.failed {
//!     eprintln!("{}: {:?}", failed.source, failed.error());
//! }
//! # Ok(())
//! # }
//! ```
pub mod batch;
pub mod client;
pub mod error;
pub mod progress;
pub mod request;


pub use batch::{download_files, BatchOptions, BatchResult, Downloader, TransferOutcome};
pub use request::{DownloadRequest, ResolvedTransfer};

pub use bulkfetch_common;
