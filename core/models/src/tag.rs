//! Hierarchical tags.
//!
//! Tags are derived views over the raw path strings stored on a note;
//! they have no identity or lifecycle of their own.

use serde::{Deserialize, Serialize};

use inkvault_common::{Error, Result};

/// Separator between tag hierarchy levels.
pub const TAG_SEPARATOR: char = '/';

/// A tag with hierarchical structure, e.g. `work/project/urgent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Full path of the tag.
    pub path: String,
    /// Display name of this level (last path segment).
    pub name: String,
    /// Parent tag path, if the tag is nested.
    pub parent: Option<String>,
}

impl Tag {
    /// Parse a tag path into its derived view.
    ///
    /// `name` is the substring after the final separator (or the whole
    /// path if there is none); `parent` is the substring before it.
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once(TAG_SEPARATOR) {
            Some((parent, name)) => Self {
                path: path.to_string(),
                name: name.to_string(),
                parent: Some(parent.to_string()),
            },
            None => Self {
                path: path.to_string(),
                name: path.to_string(),
                parent: None,
            },
        }
    }

    /// Every proper, non-empty prefix path, root-first, excluding the
    /// path itself: `"a/b/c"` yields `["a", "a/b"]`.
    pub fn ancestors(&self) -> Vec<String> {
        let parts: Vec<&str> = self.path.split(TAG_SEPARATOR).collect();
        (1..parts.len()).map(|i| parts[..i].join("/")).collect()
    }

    /// Validate a tag path: non-empty, no empty segments, no leading or
    /// trailing separator.
    pub fn validate_path(path: &str) -> Result<()> {
        if path.is_empty() {
            return Err(Error::InvalidInput("tag path cannot be empty".to_string()));
        }
        if path.split(TAG_SEPARATOR).any(str::is_empty) {
            return Err(Error::InvalidInput(format!(
                "tag path has empty segment: {path:?}"
            )));
        }
        Ok(())
    }
}
