use std::path::Path;

use bulkfetch_core::DownloadRequest;
use log::debug;
use tokio::fs::read_to_string;

use crate::error::CliError;

/// Parses the contents of an input file into download requests.
///
/// Every non-empty line holds a URL optionally followed by the file name to save it as,
/// separated by whitespace. Lines starting with `#` are comments.
pub fn parse_input(file: &str, contents: &str) -> Result<Vec<DownloadRequest>, CliError> {
    let mut requests = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(url), name, None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(CliError::MalformedInputLine {
                file: file.to_string(),
                line: idx + 1,
            });
        };

        requests.push(DownloadRequest::new(url, name.map(str::to_string)));
    }

    Ok(requests)
}

/// Collects the requests of one run: positional URLs first, then the lines of `input`.
pub async fn collect_requests(
    urls: &[String],
    input: Option<&Path>,
) -> Result<Vec<DownloadRequest>, CliError> {
    let mut requests: Vec<DownloadRequest> = urls
        .iter()
        .map(|url| DownloadRequest::from(url.as_str()))
        .collect();

    if let Some(path) = input {
        let contents = read_to_string(path).await?;
        let from_file = parse_input(&path.display().to_string(), &contents)?;
        debug!("Read {} requests from {}", from_file.len(), path.display());
        requests.extend(from_file);
    }

    if requests.is_empty() {
        return Err(CliError::NoRequestsInInput);
    }

    Ok(requests)
}
