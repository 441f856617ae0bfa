#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::ApiClient;
pub(crate) use client::endpoint;
pub use error::ApiError;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// A JSON endpoint on the file-drop server
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}
