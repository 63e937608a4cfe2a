use std::fmt::Debug;
use std::sync::Arc;

/// Type of log event, used for styling or filtering messages in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    /// File was skipped because it already exists.
    Skip,
    /// A transfer failed.
    Error,
}

/// Trait for reporting aggregate progress over a whole batch of transfers.
/// All methods should be thread-safe.
pub trait ProgressListener: Send + Sync + Debug {
    /// Sets the total number of transfers for the main progress.
    fn set_main_total(&self, total: u64);
    /// Signals that one transfer attempt finished, successfully or not.
    fn main_tick(&self);
    /// Signals that every transfer of the batch finished.
    fn main_done(&self);

    /// Adds a new task for individual download progress tracking (a single file).
    ///
    /// # Arguments
    /// * `name`: A descriptive name for the task (e.g., destination path).
    /// * `total_size`: The declared size in bytes of the body, `0` when unknown.
    ///
    /// # Returns
    /// A `Box<dyn DownloadProgressUpdater>` to update the progress of this specific task.
    fn add_download_task(&self, name: String, total_size: u64)
        -> Box<dyn DownloadProgressUpdater>;

    /// Logs a categorized event message to be displayed in the progress UI.
    ///
    /// # Arguments
    /// * `log_type`: The category of the log message.
    /// * `target`: A string identifying the subject of the log (e.g., a file name).
    /// * `message`: The descriptive message content.
    fn log_event(&self, log_type: LogType, target: &str, message: &str);
}

/// Trait for updating the progress of an individual download task.
pub trait DownloadProgressUpdater: Send + Sync + Debug {
    /// Adds `delta` freshly written bytes.
    fn inc(&self, delta: u64);
    /// Signals that this download task is finished (successfully or not).
    fn finish(&self);
}

/// A no-operation implementation of `ProgressListener`.
/// Used as a default when no actual progress reporting is needed by the library consumer.
#[derive(Debug, Clone)]
pub struct NoOpProgressListener;

impl ProgressListener for NoOpProgressListener {
    fn set_main_total(&self, _total: u64) {}
    fn main_tick(&self) {}
    fn main_done(&self) {}
    fn add_download_task(
        &self,
        _name: String,
        _total_size: u64,
    ) -> Box<dyn DownloadProgressUpdater> {
        Box::new(NoOpDownloadProgressUpdater)
    }
    fn log_event(&self, _log_type: LogType, _target: &str, _message: &str) {}
}

/// A no-operation implementation of `DownloadProgressUpdater`.
#[derive(Debug, Clone)]
pub struct NoOpDownloadProgressUpdater;

impl DownloadProgressUpdater for NoOpDownloadProgressUpdater {
    fn inc(&self, _delta: u64) {}
    fn finish(&self) {}
}

/// Convenience type alias for a shared, thread-safe progress listener.
pub type SharedProgressListener = Arc<dyn ProgressListener>;

/// Returns a shared instance of a `NoOpProgressListener`.
pub fn no_op_progress_listener() -> SharedProgressListener {
    Arc::new(NoOpProgressListener)
}

/// Ticks the main progress exactly once when dropped, whatever way the transfer ends.
pub(crate) struct MainTickGuard(pub(crate) SharedProgressListener);

impl Drop for MainTickGuard {
    fn drop(&mut self) {
        self.0.main_tick();
    }
}

/// Finishes a per-file progress updater when dropped.
pub(crate) struct FinishOnDrop(pub(crate) Box<dyn DownloadProgressUpdater>);

impl FinishOnDrop {
    #[inline]
    pub(crate) fn inc(&self, delta: u64) {
        self.0.inc(delta);
    }
}

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.finish();
    }
}
