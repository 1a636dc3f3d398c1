//! Authenticated encryption using AES-256-GCM.
//!
//! Every encrypted buffer uses the wire layout
//! `nonce (12 bytes) ‖ ciphertext ‖ tag (16 bytes)` with a fresh random
//! nonce per call.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::keys::KEY_LENGTH;
use inkvault_common::{Error, Result};

/// Nonce size for AES-256-GCM (96-bit).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Encrypt plaintext under the given key.
///
/// # Postconditions
/// - Returns `nonce ‖ ciphertext ‖ tag`
/// - The nonce is freshly random; encrypting the same plaintext twice
///   yields different outputs by design
///
/// # Errors
/// - `Cipher` if the key length is wrong or sealing fails
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| {
        Error::Cipher(format!(
            "invalid key length: expected {KEY_LENGTH}, got {}",
            key.len()
        ))
    })?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| Error::Cipher(format!("encryption failed: {e}")))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt a `nonce ‖ ciphertext ‖ tag` buffer.
///
/// # Errors
/// - `Cipher` if the key length is wrong
/// - `Authentication` for every other failure. Short input, a flipped
///   bit and a wrong key all look identical to the caller, so the error
///   cannot be used as a password oracle.
pub fn decrypt(key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| {
        Error::Cipher(format!(
            "invalid key length: expected {KEY_LENGTH}, got {}",
            key.len()
        ))
    })?;

    if blob.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::Authentication);
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| Error::Authentication)
}
