//! AES-256-CBC blob encryption with PKCS#7 padding
//!
//! The blob format is `iv (16 bytes) || ciphertext`, where the ciphertext is
//! a whole number of 16-byte blocks. Decryption is a pure function of
//! `(blob, key)`: no randomness and no hidden state, so the same inputs always
//! give the same plaintext or the same error.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::secret::SymmetricKey;

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// Size of the CBC initialization vector in bytes
pub const IV_SIZE: usize = 16;
/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Errors that can occur while decrypting a downloaded blob
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The blob cannot be `iv || ciphertext`: it is shorter than an IV, or
    /// the ciphertext is empty or not block aligned
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),
    /// The trailing bytes are not a valid PKCS#7 pattern. A wrong key,
    /// corrupted data and tampering all end up here.
    #[error("invalid padding (wrong key or corrupted data)")]
    PaddingError,
    #[error("failed to generate iv: {0}")]
    Rng(String),
}

/// Anything that can turn an `iv || ciphertext` blob back into plaintext
///
/// The transfer client only depends on this trait, which keeps the engine
/// swappable (and countable) in tests.
pub trait BlobDecryptor: Send + Sync {
    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

impl BlobDecryptor for SymmetricKey {
    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        decrypt(blob, self)
    }
}

/// Decrypt an `iv || ciphertext` blob
///
/// # Errors
///
/// Returns [`CryptoError::MalformedCiphertext`] if the blob is shorter than
/// the IV, or if what follows the IV is empty or not a multiple of the block
/// size. Returns [`CryptoError::PaddingError`] if the decrypted tail is not a
/// consistent PKCS#7 pattern.
pub fn decrypt(blob: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, CryptoError> {
    if blob.len() < IV_SIZE {
        return Err(CryptoError::MalformedCiphertext(format!(
            "blob is {} bytes, shorter than the {} byte iv",
            blob.len(),
            IV_SIZE
        )));
    }

    let (iv, ciphertext) = blob.split_at(IV_SIZE);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::MalformedCiphertext(format!(
            "ciphertext is {} bytes, expected a non-zero multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }

    let mut iv_buff = [0u8; IV_SIZE];
    iv_buff.copy_from_slice(iv);

    Aes256CbcDec::new(key.bytes().into(), (&iv_buff).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::PaddingError)
}

/// Encrypt `plaintext` under `key` with an explicit IV
///
/// Produces the exact layout the server stores: `iv || ciphertext`.
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey, iv: &[u8; IV_SIZE]) -> Vec<u8> {
    let ciphertext =
        Aes256CbcEnc::new(key.bytes().into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(IV_SIZE + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Encrypt `plaintext` under `key` with a fresh random IV
pub fn seal(plaintext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, CryptoError> {
    let mut iv = [0u8; IV_SIZE];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::Rng(e.to_string()))?;
    Ok(encrypt(plaintext, key, &iv))
}
