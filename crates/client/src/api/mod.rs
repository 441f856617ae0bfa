pub mod client;
pub mod files;
pub mod recipients;

pub use client::{ApiClient, ApiError, ApiRequest};
pub use files::ListFilesRequest;
pub use recipients::RecipientsRequest;
