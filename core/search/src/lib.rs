//! Full-text search for inkvault.
//!
//! A per-vault tantivy index over plaintext note fields. The engine only
//! ever sees content the caller has already decrypted; it never touches
//! ciphertext or passwords. One writer at a time per index, any number
//! of concurrent readers observing the last committed state.

pub mod engine;

pub use engine::SearchEngine;
