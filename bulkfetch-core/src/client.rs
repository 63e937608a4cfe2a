//! The network capability the downloader depends on.
//!
//! Transfers only need `GET url` returning a status, the declared body length and a
//! chunked body. [`HttpClient`] captures exactly that so the batch logic can run against
//! the real [`ReqwestClient`] or against an in-memory double.
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use bulkfetch_common::default_user_agent;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use log::debug;
use reqwest::Client;

use crate::error::TransferError;

/// Body of a response, delivered as a stream of chunks.
pub type BodyStream = BoxStream<'static, Result<Bytes, TransferError>>;

/// Response to a single `GET`.
pub struct RemoteResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Length` header, if the server sent one.
    pub content_length: Option<u64>,
    pub body: BodyStream,
}

impl Debug for RemoteResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Minimal HTTP capability used by every transfer of a batch.
///
/// Implementations are shared across concurrent transfers and must not rely on per-call
/// mutable state.
#[async_trait]
pub trait HttpClient: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<RemoteResponse, TransferError>;
}

/// Options for the default reqwest-backed client.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Custom user agent. Defaults to `bulkfetch/<version>`.
    pub user_agent: Option<String>,
    /// Connection timeout. `None` keeps reqwest's default (no timeout).
    pub connect_timeout: Option<Duration>,
}

/// [`HttpClient`] backed by a shared `reqwest::Client` connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds a fresh client out of `options`.
    pub fn new(options: &ClientOptions) -> Result<Self, reqwest::Error> {
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wraps an already configured client.
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<RemoteResponse, TransferError> {
        let res = self.client.get(url).send().await?;

        debug!("{} answered with status {}", url, res.status());

        Ok(RemoteResponse {
            status: res.status().as_u16(),
            content_length: res.content_length(),
            body: res
                .bytes_stream()
                .map_err(|e| TransferError::ChunkDownloadFail {
                    message: e.to_string(),
                })
                .boxed(),
        })
    }
}
