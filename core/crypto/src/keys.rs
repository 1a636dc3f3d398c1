//! Key and salt types with secure memory handling.
//!
//! Key material automatically zeroizes its memory on drop so it cannot
//! persist in memory after the owning manager is gone.

use aes_gcm::aead::OsRng;
use argon2::password_hash::SaltString;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use inkvault_common::{Error, Result};

/// Length of derived encryption keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Key derived from a user password and a per-vault salt.
///
/// Zeroized on every exit path by construction: the buffer is wiped when
/// the value is dropped, whether by normal return, early error or unwind.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Create a master key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey([REDACTED])")
    }
}

/// Per-vault salt for key derivation, kept as printable base64 text.
///
/// Salts are not secret but must never be reused across vaults, so two
/// vaults with identical passwords still derive distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt(String);

impl Salt {
    /// Generate a fresh random salt from the OS RNG.
    pub fn generate() -> Self {
        Self(SaltString::generate(&mut OsRng).to_string())
    }

    /// Validate and wrap an existing printable salt.
    ///
    /// # Errors
    /// - `KeyDerivation` if the string is not valid salt base64
    pub fn from_b64(value: &str) -> Result<Self> {
        SaltString::from_b64(value)
            .map_err(|e| Error::KeyDerivation(format!("invalid salt: {e}")))?;
        Ok(Self(value.to_string()))
    }

    /// The printable form, as stored in vault metadata.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode to the raw bytes fed into the KDF.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let salt = SaltString::from_b64(&self.0)
            .map_err(|e| Error::KeyDerivation(format!("invalid salt: {e}")))?;
        let mut buf = [0u8; argon2::password_hash::Salt::MAX_LENGTH];
        let decoded = salt
            .decode_b64(&mut buf)
            .map_err(|e| Error::KeyDerivation(format!("invalid salt: {e}")))?;
        Ok(decoded.to_vec())
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
