use reqwest::{Client, RequestBuilder, Url};

use super::client::{endpoint, ApiError, ApiRequest};

/// `GET /get_ips`: addresses a file can be addressed to
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct RecipientsRequest;

impl ApiRequest for RecipientsRequest {
    type Response = Vec<String>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = endpoint(base_url, &["get_ips"])?;
        Ok(client.get(full_url))
    }
}
