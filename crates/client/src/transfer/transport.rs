use bytes::Bytes;
use futures::stream;
use reqwest::multipart;
use reqwest::StatusCode;

use super::progress::ProgressReporter;
use crate::api::{ApiClient, ApiError};

/// Size of the chunks an upload body is streamed in
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Status and body of a completed HTTP exchange, not yet interpreted
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// The multipart form sent to `POST /upload`
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub file_name: String,
    pub data: Bytes,
    pub recipient: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// The network half of a transfer
///
/// Implementations move bytes and report raw status codes; deciding what a
/// status or body means is left to the caller.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn upload(
        &self,
        form: UploadForm,
        progress: ProgressReporter,
    ) -> Result<RawResponse, TransportError>;

    async fn download(&self, server_file_id: &str) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] over HTTP against a live file-drop server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ApiClient,
}

impl HttpTransport {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn chunked(data: Bytes, chunk_size: usize) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(data.len() / chunk_size + 1);
    let mut offset = 0;
    while offset < data.len() {
        let end = (offset + chunk_size).min(data.len());
        chunks.push(data.slice(offset..end));
        offset = end;
    }
    chunks
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn upload(
        &self,
        form: UploadForm,
        progress: ProgressReporter,
    ) -> Result<RawResponse, TransportError> {
        let total = form.data.len() as u64;

        // count bytes as reqwest pulls them off the body stream
        let body = stream::iter(chunked(form.data, UPLOAD_CHUNK_SIZE).into_iter().map(
            move |chunk| {
                progress.advance(chunk.len() as u64);
                Ok::<Bytes, std::io::Error>(chunk)
            },
        ));
        let part = multipart::Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(form.file_name)
            .mime_str("application/octet-stream")?;
        let multipart = multipart::Form::new()
            .part("file", part)
            .text("recipient", form.recipient);

        let url = self.client.endpoint(&["upload"])?;
        let response = self
            .client
            .http_client()
            .post(url)
            .multipart(multipart)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }

    async fn download(&self, server_file_id: &str) -> Result<RawResponse, TransportError> {
        let url = self.client.endpoint(&["download", server_file_id])?;
        let response = self.client.http_client().get(url).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}
