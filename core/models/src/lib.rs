//! Data model for inkvault.
//!
//! This module provides the note, vault and tag value types and enforces
//! their invariants:
//! - note ids and creation timestamps are never reassigned
//! - note versions strictly increase, by exactly one per update
//! - tag paths are hierarchical, `/`-separated, with no empty segments
//! - a vault's salt is fixed for its lifetime

pub mod note;
pub mod tag;
pub mod vault;

pub use note::Note;
pub use tag::Tag;
pub use vault::{ConflictResolution, Vault, VaultMetadata};
