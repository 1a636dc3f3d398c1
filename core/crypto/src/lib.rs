//! Cryptographic primitives for inkvault.
//!
//! This module provides:
//! - Key derivation using Argon2id
//! - Authenticated encryption using AES-256-GCM
//! - Secure key management with automatic zeroization
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Decryption failures never reveal whether the key was wrong or the
//!   data was tampered with

pub mod aead;
pub mod kdf;
pub mod keys;
pub mod manager;

pub use aead::{decrypt, encrypt, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_key, KdfParams};
pub use keys::{MasterKey, Salt, KEY_LENGTH};
pub use manager::EncryptionManager;
