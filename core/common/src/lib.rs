//! Common utilities and types shared across inkvault modules.
//!
//! This module provides foundational types that are used throughout the
//! codebase, ensuring consistency and type safety.

pub mod error;
pub mod path;

pub use error::{Error, Result};
pub use path::SafePath;
