use std::time::Duration;

use common::listing::{FileRecord, Recipients, SortSpec};
use common::wire::ServerMessage;
use reqwest::Client;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;
use crate::api::files::ListFilesRequest;
use crate::api::recipients::RecipientsRequest;

/// Bound on establishing a connection; request duration is left to callers
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::HttpStatus(status, ServerMessage::describe(&body)));
        }

        match serde_json::from_slice::<T::Response>(&body) {
            Ok(decoded) => Ok(decoded),
            // the server reports some failures as a 2xx `{"error": ...}` object
            Err(e) => match serde_json::from_slice::<ServerMessage>(&body) {
                Ok(msg) => Err(ApiError::Server(msg.error)),
                Err(_) => Err(ApiError::Decode(e)),
            },
        }
    }

    /// Fetch the file listing sorted as requested
    pub async fn list_files(&self, sort: SortSpec) -> Result<Vec<FileRecord>, ApiError> {
        self.call(ListFilesRequest::from(sort)).await
    }

    /// Fetch the upload recipients, with the "Everyone" sentinel always offered
    pub async fn recipients(&self) -> Result<Recipients, ApiError> {
        let ips = self.call(RecipientsRequest).await?;
        Ok(Recipients::from_server(ips))
    }

    /// Look up a listing record by its server-side id
    pub async fn find_record(&self, server_file_id: &str) -> Result<Option<FileRecord>, ApiError> {
        let records = self.list_files(SortSpec::default()).await?;
        Ok(records.into_iter().find(|r| r.name == server_file_id))
    }

    /// Join path segments onto the remote, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        endpoint(&self.remote, segments)
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::CannotBeBase(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
