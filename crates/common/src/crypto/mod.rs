//! Cryptographic primitives for the file-drop client
//!
//! Files are encrypted at rest by the server with AES-256 in CBC mode and
//! PKCS#7 padding. A download yields a blob laid out as:
//!
//! ```text
//! +----------------+---------------------------------+
//! |  IV (16 bytes) |  ciphertext (n * 16 bytes)      |
//! +----------------+---------------------------------+
//! ```
//!
//! The client holds a single pre-shared [`SymmetricKey`] and turns that blob
//! back into plaintext with [`decrypt`]. The server-side counterpart,
//! [`encrypt`] / [`seal`], lives here too so both halves of the format are
//! pinned down in one place.
//!
//! # Trust boundary
//!
//! The key is shared out-of-band and every file served by a deployment is
//! encrypted under it. Confidentiality holds only against parties who cannot
//! read the client's key. There is no per-file or per-recipient separation.

mod blob;
mod secret;

pub use blob::{decrypt, encrypt, seal, BlobDecryptor, CryptoError, BLOCK_SIZE, IV_SIZE};
pub use secret::{KeyError, SymmetricKey, BUILTIN_KEY_HEX, KEY_SIZE};
