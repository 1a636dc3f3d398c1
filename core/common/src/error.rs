//! Common error types for inkvault.

use thiserror::Error;

/// Top-level error type for inkvault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Password-based key derivation failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// AEAD sealing failed.
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// AEAD opening failed.
    ///
    /// Deliberately carries no detail: a wrong password and tampered
    /// ciphertext are indistinguishable to the caller.
    #[error("Decryption failed")]
    Authentication,

    /// A relative path would escape the storage root.
    #[error("Path traversal rejected: {0}")]
    PathTraversal(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not permitted by the OS.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search index is unusable or failed internally.
    #[error("Index error: {0}")]
    IndexCorrupt(String),

    /// Query syntax could not be parsed.
    #[error("Cannot parse query {query:?}: {message}")]
    QueryParse { query: String, message: String },

    /// A second writer was opened against an index.
    #[error("Index writer already locked")]
    WriterLocked,

    /// Archive container is malformed.
    #[error("Archive corrupt: {0}")]
    ArchiveCorrupt(String),

    /// Archive is missing its metadata entry.
    #[error("Archive metadata entry missing")]
    MetadataMissing,

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
