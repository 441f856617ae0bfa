use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("URL cannot be used as a base: {0}")]
    CannotBeBase(String),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("server error: {0}")]
    Server(String),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}
