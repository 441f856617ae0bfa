use serde::{Deserialize, Serialize};

use crate::listing::FileRecord;

/// Raw JSON body the server sends back from `POST /upload`
///
/// The server signals a logical failure by setting `error` on an otherwise
/// successful (200) response. This shape never leaves this module; callers
/// get an [`UploadReply`].
#[derive(Debug, Default, Deserialize, Serialize)]
struct RawUploadBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    file: Option<FileRecord>,
}

/// Decoded outcome of an upload the transport delivered successfully
#[derive(Debug, Clone, PartialEq)]
pub enum UploadReply {
    Accepted {
        message: Option<String>,
        file: Option<FileRecord>,
    },
    Rejected {
        reason: String,
    },
}

impl UploadReply {
    /// Decode a 200 response body into an accepted or rejected upload
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawUploadBody = serde_json::from_slice(body)?;
        Ok(match raw.error {
            Some(reason) => UploadReply::Rejected { reason },
            None => UploadReply::Accepted {
                message: raw.message,
                file: raw.file,
            },
        })
    }
}

/// `{"error": "..."}` bodies the server attaches to failed requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    pub error: String,
}

impl ServerMessage {
    /// Best-effort human message from an error response body: the `error`
    /// field if the body is that JSON shape, otherwise the trimmed text.
    pub fn describe(body: &[u8]) -> String {
        match serde_json::from_slice::<ServerMessage>(body) {
            Ok(msg) => msg.error,
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        }
    }
}
