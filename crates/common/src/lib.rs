/**
 * Client-side cryptography.
 *  - The pre-shared symmetric key
 *  - AES-256-CBC blob decryption (and the
 *    server-side encryption counterpart)
 */
pub mod crypto;
/**
 * Listing collaborator types: file records,
 *  explicit sort parameters, recipient lists
 *  and human-readable size formatting.
 */
pub mod listing;
/**
 * Upload progress arithmetic, kept free of
 *  any transport so it can be checked directly.
 */
pub mod progress;
/**
 * Wire types exchanged with the file-drop server
 *  and their decoding at the boundary.
 */
pub mod wire;

pub mod prelude {
    pub use crate::crypto::{BlobDecryptor, CryptoError, KeyError, SymmetricKey};
    pub use crate::listing::{FileRecord, Recipients, SortColumn, SortOrder, SortSpec, EVERYONE};
    pub use crate::progress::ProgressTracker;
    pub use crate::wire::{ServerMessage, UploadReply};
}
