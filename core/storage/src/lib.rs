//! Sandboxed file storage for inkvault.
//!
//! All byte I/O is confined to a vault's root directory. Paths are
//! validated before they ever touch the filesystem, writes are atomic,
//! and every operation is synchronous — callers own their own threading
//! model.

pub mod local;

pub use local::FileStorage;
