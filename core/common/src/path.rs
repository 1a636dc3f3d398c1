//! Validated relative paths for sandboxed storage.
//!
//! A `SafePath` can only be built from components that cannot escape the
//! directory it is resolved against, so storage code never has to reason
//! about `..` segments or absolute paths after parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::{Error, Result};

/// A relative path within a storage root.
///
/// Uses `/` as separator regardless of platform. Components must be
/// non-empty, contain no separators and must not be `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SafePath {
    components: Vec<String>,
}

impl SafePath {
    /// Create a root (empty) path.
    pub fn root() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Create a path from validated components.
    ///
    /// # Errors
    /// - `PathTraversal` if any component is empty, contains a separator,
    ///   or is a `.`/`..` segment
    pub fn from_components(components: Vec<String>) -> Result<Self> {
        for comp in &components {
            validate_component(comp)?;
        }
        Ok(Self { components })
    }

    /// Parse a `/`-separated relative path.
    ///
    /// Absolute paths (leading `/`, `\` or a drive prefix) are rejected
    /// outright; they can never be relative to a storage root.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        if path.starts_with('/') || path.starts_with('\\') || path.contains(':') {
            return Err(Error::PathTraversal(format!(
                "absolute path not allowed: {path}"
            )));
        }

        let components: Vec<String> = path
            .trim_end_matches('/')
            .split('/')
            .map(String::from)
            .collect();
        Self::from_components(components)
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the parent path, if any.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            None
        } else {
            let mut components = self.components.clone();
            components.pop();
            Some(Self { components })
        }
    }

    /// Get the file/directory name (last component).
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(|s| s.as_str())
    }

    /// Join this path with a child component.
    pub fn join(&self, child: &str) -> Result<Self> {
        validate_component(child)?;
        let mut components = self.components.clone();
        components.push(child.to_string());
        Ok(Self { components })
    }

    /// Get the path components.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Resolve against a base directory, producing a filesystem path.
    ///
    /// The result is always strictly inside `base` because every
    /// component was validated at construction.
    pub fn resolve(&self, base: &std::path::Path) -> PathBuf {
        let mut out = base.to_path_buf();
        for comp in &self.components {
            out.push(comp);
        }
        out
    }
}

impl fmt::Display for SafePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

fn validate_component(comp: &str) -> Result<()> {
    if comp.is_empty() {
        return Err(Error::PathTraversal(
            "empty path component".to_string(),
        ));
    }
    if comp.contains('/') || comp.contains('\\') {
        return Err(Error::PathTraversal(format!(
            "component contains separator: {comp}"
        )));
    }
    if comp == "." || comp == ".." {
        return Err(Error::PathTraversal(format!(
            "relative segment not allowed: {comp}"
        )));
    }
    Ok(())
}
