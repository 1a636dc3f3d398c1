//! Encryption manager tying KDF and AEAD together for one unlocked vault.

use crate::aead;
use crate::kdf::{derive_key, KdfParams};
use crate::keys::{MasterKey, Salt};
use inkvault_common::Result;

/// Authenticated encryption for one vault, keyed by password + salt.
///
/// Each manager is a pure function of the password and salt handed to
/// its constructor; independent managers for different vaults share no
/// state. The derived key is wiped from memory when the manager drops.
pub struct EncryptionManager {
    key: MasterKey,
}

impl EncryptionManager {
    /// Derive a key from a password and per-vault salt.
    ///
    /// Uses the default (interactive) Argon2id parameters.
    ///
    /// # Errors
    /// - `KeyDerivation` if the password is empty or the salt is invalid
    pub fn new_from_password(password: &str, salt: &Salt) -> Result<Self> {
        Self::with_params(password, salt, &KdfParams::default())
    }

    /// Derive a key with explicit KDF parameters.
    pub fn with_params(password: &str, salt: &Salt, params: &KdfParams) -> Result<Self> {
        let key = derive_key(password.as_bytes(), salt, params)?;
        Ok(Self { key })
    }

    /// Generate a fresh random salt for a new vault.
    pub fn generate_salt() -> Salt {
        Salt::generate()
    }

    /// Encrypt a byte buffer, producing `nonce ‖ ciphertext ‖ tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        aead::encrypt(self.key.as_bytes(), plaintext)
    }

    /// Decrypt a `nonce ‖ ciphertext ‖ tag` buffer.
    ///
    /// # Errors
    /// - `Authentication` on any failure, with no indication whether the
    ///   password was wrong or the data was tampered with
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>> {
        aead::decrypt(self.key.as_bytes(), blob)
    }
}

impl std::fmt::Debug for EncryptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncryptionManager({:?})", self.key)
    }
}
