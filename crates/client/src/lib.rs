//! Client for an encrypted file-drop server
//!
//! Uploads go up as plain multipart forms; the server encrypts at rest.
//! Downloads come back as `iv || ciphertext` and are decrypted locally with
//! the deployment's pre-shared key before anything touches the disk.

pub mod api;
pub mod listing;
pub mod state;
pub mod transfer;
pub mod version;

pub use api::{ApiClient, ApiError};
pub use state::{AppConfig, AppState, StateError};
pub use transfer::{TransferClient, TransferControl, TransferError};
