#![deny(clippy::all)]
use std::process::exit;
use std::sync::Arc;

use bulkfetch_cli::cli::{extra::collect_requests, Cli};
use bulkfetch_cli::config::FileConfig;
use bulkfetch_cli::progress_bars::IndicatifProgressHandler;
use bulkfetch_core::progress::SharedProgressListener;
use bulkfetch_core::{BatchResult, Downloader};
use bytesize::ByteSize;
use clap::Parser;
use color_eyre::eyre::Result;
use log::{debug, info};
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    let config = FileConfig::load().await?;

    let requests = collect_requests(&args.urls, args.input.as_deref()).await?;
    let options = args.batch_options(&config)?;
    debug!("Batch options: {:?}", options);

    let progress_handler: SharedProgressListener =
        Arc::new(IndicatifProgressHandler::new(args.desc.clone(), args.leave));

    let downloader = Downloader::new(
        None,
        &args.client_options(&config),
        Some(progress_handler),
    )?
    .chunk_size(args.chunk_size(&config))
    .transfer_timeout(args.transfer_timeout(&config));

    let results = downloader.download_files(requests, &options).await?;

    if let Some(report) = &args.report {
        results.write_report(report, args.checksums).await?;
        info!("Report written to {}", report.display());
    }

    print_results(&results);

    if !results.all_succeeded() {
        exit(1);
    }

    Ok(())
}

fn print_results(results: &BatchResult) {
    println!(
        "{} {} {} ({})",
        results.succeeded.len().to_string().bold().blue(),
        "files".bold().blue(),
        "downloaded".bold(),
        human_size(results.total_bytes()).bold()
    );

    if results.failed.is_empty() {
        return;
    }

    println!(
        "{} {}",
        results.failed.len().to_string().bold().red(),
        "files could not be downloaded:".bold().red()
    );

    for outcome in &results.failed {
        let reason = outcome
            .error()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!(
            "  {} {}",
            outcome.destination_path.display().blue().italic(),
            reason.red()
        );
    }
}

fn human_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string_as(true)
}
