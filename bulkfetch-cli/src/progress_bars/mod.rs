use bulkfetch_core::progress::{DownloadProgressUpdater, LogType, ProgressListener};
use indicatif::{
    HumanBytes, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle,
};
use owo_colors::OwoColorize;
use std::{fmt::Write, time::Duration};

const PROGRESS_CHARS: &str = "━━";

const MAIN_TEMPLATE: &str = "{spinner:.green.bold} {msg:.bold} {elapsed_precise:.bold} {wide_bar:.green/white.dim} {percent:.bold}  {pos:.green} (eta. {eta:.blue})";

const DOWNLOAD_TEMPLATE: &str = "{spinner:.green.bold} {msg:50} {bar:40.green/white.dim} {percent:.bold} | {byte_progress:21.green} @ {bytes_per_sec:>13.red} (eta. {eta:<4.blue})";

/// Draws the batch as one aggregate bar plus one bar per running transfer.
#[derive(Debug)]
pub struct IndicatifProgressHandler {
    main_bar: ProgressBar,
    multi_pb: MultiProgress,
    leave: bool,
}

impl IndicatifProgressHandler {
    /// Initialize the main progress bar, labelled with `description`.
    ///
    /// With `leave` set, per-file bars stay on screen once their transfer ends.
    pub fn new(description: impl Into<String>, leave: bool) -> Self {
        let bar = ProgressBar::new(0)
            .with_style(master_progress_style())
            .with_message(description.into());
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.enable_steady_tick(Duration::from_millis(100));

        let multi = MultiProgress::new();
        let main = multi.add(bar);

        Self {
            main_bar: main,
            multi_pb: multi,
            leave,
        }
    }
}

#[derive(Debug)]
struct IndicatifDownloadProgressUpdater {
    bar: ProgressBar,
    leave: bool,
}

impl DownloadProgressUpdater for IndicatifDownloadProgressUpdater {
    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self) {
        if self.leave {
            self.bar.finish();
        } else {
            self.bar.finish_and_clear();
        }
    }
}

impl ProgressListener for IndicatifProgressHandler {
    fn set_main_total(&self, total: u64) {
        self.main_bar.set_length(total);
    }

    fn main_tick(&self) {
        self.main_bar.inc(1);
    }

    fn main_done(&self) {
        self.main_bar.finish();
    }

    fn add_download_task(&self, name: String, total_size: u64) -> Box<dyn DownloadProgressUpdater> {
        let pb = ProgressBar::new(total_size)
            .with_style(download_progress_style())
            .with_message(name);
        pb.set_draw_target(ProgressDrawTarget::stderr());

        let managed_pb = self.multi_pb.add(pb);

        Box::new(IndicatifDownloadProgressUpdater {
            bar: managed_pb,
            leave: self.leave,
        })
    }

    fn log_event(&self, log_type: LogType, target: &str, message: &str) {
        let formatted_message = match log_type {
            LogType::Skip => format!(
                "{} {} {}",
                target.blue().italic(),
                message.green().bold(),
                "Skipping...".green().bold()
            ),
            LogType::Error => format!(
                "{} {} {}",
                target.blue().italic(),
                message.red().bold(),
                "Error.".red().bold()
            ),
        };

        self.main_bar.println(formatted_message);
    }
}

fn master_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(MAIN_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("pos", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{}/{}", state.pos(), state.len().unwrap_or(0));
        })
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .progress_chars(PROGRESS_CHARS)
}

fn download_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(DOWNLOAD_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .with_key(
            "byte_progress",
            |state: &ProgressState, w: &mut dyn Write| match state.len() {
                Some(len) if len > 0 => {
                    let _ = write!(w, "{}/{}", HumanBytes(state.pos()), HumanBytes(len));
                }
                // Unknown size
                _ => {
                    let _ = write!(w, "{}", HumanBytes(state.pos()));
                }
            },
        )
        .progress_chars(PROGRESS_CHARS)
}
