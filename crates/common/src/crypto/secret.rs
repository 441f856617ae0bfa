use std::fmt;

/// Size of the AES-256 key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// The key baked into this deployment's client and server.
///
/// Anyone able to read the client can read this value, so it only protects
/// files against parties who never see the client.
const BUILTIN_KEY: [u8; KEY_SIZE] = *b"ThisIsASecretKey1234567890123456";

/// Hex form of the embedded key, as written into fresh config files
pub const BUILTIN_KEY_HEX: &str =
    "546869734973415365637265744b657931323334353637383930313233343536";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid key hex: {0}")]
    InvalidHex(String),
    #[error("invalid key size, expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// A 256-bit pre-shared key used to decrypt every file served by a deployment
///
/// Loaded once at startup and never mutated afterwards, so it can be shared
/// freely between concurrent transfers.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

impl From<[u8; KEY_SIZE]> for SymmetricKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        SymmetricKey(bytes)
    }
}

impl TryFrom<&[u8]> for SymmetricKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != KEY_SIZE {
            return Err(KeyError::InvalidLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut buff = [0; KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(buff.into())
    }
}

impl SymmetricKey {
    /// The deployment's embedded key
    pub fn builtin() -> Self {
        SymmetricKey(BUILTIN_KEY)
    }

    /// Parse a key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings. Surrounding
    /// whitespace is ignored so values pasted into config files still parse.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.len() != KEY_SIZE * 2 {
            return Err(KeyError::InvalidLength {
                expected: KEY_SIZE,
                actual: hex.len() / 2,
            });
        }
        let mut buff = [0; KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        Ok(buff.into())
    }

    /// Convert key to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get a reference to the key bytes
    pub fn bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}
