//! Transport layer: how requests reach the service
//!
//! The client core never talks HTTP directly; it goes through the
//! [`Transport`] trait, which models the service as "send a request, get
//! status and body back, hear about progress along the way". Production
//! use goes through [`HttpTransport`]; tests substitute a scripted
//! transport.

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use futures::StreamExt;
use url::Url;

/// Size of the chunks an upload body is streamed in. Each chunk handed to
/// the connection produces one progress callback.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Progress callback: (bytes transferred so far, total when known)
pub type ProgressFn = Box<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Status line and complete body of a finished exchange.
///
/// Non-success statuses are carried here rather than raised as errors: the
/// service reports failures in the body and callers inspect content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, in full
    pub body: Vec<u8>,
}

/// One HTTP exchange against the service
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url`, streaming the response body. `progress` fires once per
    /// received chunk with the running byte count.
    async fn get(&self, url: Url, progress: Option<ProgressFn>) -> Result<TransportResponse>;

    /// POST `body` to `url` as `application/octet-stream`, streaming it in
    /// chunks. `progress` fires as each chunk is handed to the connection;
    /// the final callback reports `sent == total`.
    async fn post(
        &self,
        url: Url,
        body: Vec<u8>,
        progress: Option<ProgressFn>,
    ) -> Result<TransportResponse>;
}

/// [`Transport`] implementation over a shared [`reqwest::Client`]
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the HTTP transport from the client configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Drain a streamed response body, reporting progress per chunk.
    async fn collect_body(
        response: reqwest::Response,
        progress: Option<ProgressFn>,
    ) -> Result<TransportResponse> {
        let status = response.status().as_u16();
        let total = response.content_length();
        let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.extend_from_slice(&chunk);
            if let Some(report) = &progress {
                report(body.len() as u64, total);
            }
        }
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url, progress: Option<ProgressFn>) -> Result<TransportResponse> {
        let response = self.client.get(url).send().await?;
        Self::collect_body(response, progress).await
    }

    async fn post(
        &self,
        url: Url,
        body: Vec<u8>,
        progress: Option<ProgressFn>,
    ) -> Result<TransportResponse> {
        let total = body.len() as u64;
        let chunks: Vec<Vec<u8>> = body.chunks(UPLOAD_CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            if let Some(report) = &progress {
                report(sent, Some(total));
            }
            Ok::<_, std::io::Error>(chunk)
        }));

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header(reqwest::header::CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;
        // Upload responses are small acknowledgements; no progress on the
        // way back.
        Self::collect_body(response, None).await
    }
}
