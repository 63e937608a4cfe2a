use std::time::Duration;

use futures::StreamExt;
use tokio::fs::File;
use log::debug;
use tokio::{
    fs::OpenOptions,
    io::{AsyncWriteExt, BufWriter},
    time::timeout,
};

use crate::client::{BodyStream, HttpClient};
use crate::error::TransferError;
use crate::progress::{FinishOnDrop, LogType, SharedProgressListener};
use crate::request::ResolvedTransfer;

use bulkfetch_common::formatter::trunc_str;

/// Longest label shown next to a per-file progress bar.
const LABEL_LEN: usize = 50;

/// Runs one transfer, honouring the optional timeout.
pub(crate) async fn run_transfer(
    client: &dyn HttpClient,
    transfer: &ResolvedTransfer,
    chunk_size: usize,
    transfer_timeout: Option<Duration>,
    progress_listener: &SharedProgressListener,
) -> Result<u64, TransferError> {
    let body_transfer = fetch(client, transfer, chunk_size, progress_listener);

    match transfer_timeout {
        Some(limit) => match timeout(limit, body_transfer).await {
            Ok(result) => result,
            Err(_) => Err(TransferError::Timeout {
                url: transfer.source.clone(),
            }),
        },
        None => body_transfer.await,
    }
}

/// Streams the body of `transfer.source` into `transfer.destination_path`.
///
/// Returns the number of bytes written. Partially written files are left in place when
/// the body fails midway.
async fn fetch(
    client: &dyn HttpClient,
    transfer: &ResolvedTransfer,
    chunk_size: usize,
    progress_listener: &SharedProgressListener,
) -> Result<u64, TransferError> {
    let url = &transfer.source;
    let out_path = &transfer.destination_path;

    debug!("Fetching {} into file {}", url, out_path.display());

    let res = client.get(url).await?;

    if res.status != 200 {
        debug!(
            "Source {} returned status {}. Skipping download.",
            url, res.status
        );
        progress_listener.log_event(
            LogType::Error,
            &out_path.display().to_string(),
            &format!("server returned {}", res.status),
        );
        return Err(TransferError::RemoteStatus {
            url: url.clone(),
            status: res.status,
        });
    }

    let size = res.content_length.unwrap_or_default();
    let label = trunc_str(&out_path.display().to_string(), LABEL_LEN, false, "...");
    let dl_updater = FinishOnDrop(progress_listener.add_download_task(label, size));

    debug!("Creating/writing to file {:?}", out_path);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(out_path)
        .await?;

    let mut bw = BufWriter::new(file);
    let streamed = stream_body(res.body, &mut bw, chunk_size, &dl_updater).await;

    // Flushed on both paths so every counted byte is on disk.
    let flushed = bw.flush().await;
    let written = streamed?;
    flushed?;

    debug!("Finished downloading {} ({} bytes).", url, written);
    Ok(written)
}

/// Writes every chunk of `body` in pieces of at most `chunk_size` bytes, returning the
/// number of bytes handed to `out`.
async fn stream_body(
    mut body: BodyStream,
    out: &mut BufWriter<File>,
    chunk_size: usize,
    dl_updater: &FinishOnDrop,
) -> Result<u64, TransferError> {
    let mut written: u64 = 0;

    while let Some(item) = body.next().await {
        let mut chunk = item?;

        while !chunk.is_empty() {
            let piece = chunk.split_to(chunk_size.min(chunk.len()));
            out.write_all(&piece).await?;

            let piece_len = piece.len() as u64;
            written += piece_len;
            dl_updater.inc(piece_len);
        }
    }

    Ok(written)
}
