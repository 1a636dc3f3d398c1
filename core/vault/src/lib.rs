//! Vault engine for inkvault.
//!
//! This module provides:
//! - The persisted on-disk layout (encrypted note blobs + vault metadata)
//! - Export/import of a vault as a single portable archive
//! - Conflict detection and caller-directed resolution between note sets
//!
//! # Architecture
//! The vault module composes the encryption manager and file storage;
//! it never performs key derivation itself and never writes plaintext
//! note content to disk when an encryption manager is supplied.

pub mod conflict;
pub mod manager;

pub use conflict::{detect_conflicts, merge_notes, resolve_conflict};
pub use manager::VaultManager;
