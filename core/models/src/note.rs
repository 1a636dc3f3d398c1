//! Notes and their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::tag::Tag;
use inkvault_common::{Error, Result};

/// A note in the system.
///
/// `id` and `created_at` are stamped at creation and never change;
/// `version` starts at 1 and increases by exactly one per update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Title of the note.
    pub title: String,
    /// Markdown content.
    pub content: String,
    /// Hierarchical tag paths (e.g. `work/project/urgent`), no duplicates.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Monotonically increasing version.
    pub version: u64,
}

impl Note {
    /// Create a new note.
    ///
    /// # Postconditions
    /// - Fresh v4 id, `created_at == updated_at == now`, `version == 1`
    ///
    /// # Errors
    /// - `InvalidInput` if any tag path is malformed or duplicated
    pub fn new(title: String, content: String, tags: Vec<String>) -> Result<Self> {
        validate_tags(&tags)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            content,
            tags,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    /// Rewrite title, content and tags.
    ///
    /// # Postconditions
    /// - `updated_at` is refreshed, `version` incremented by exactly 1
    /// - `id` and `created_at` are untouched
    ///
    /// # Errors
    /// - `InvalidInput` if any tag path is malformed or duplicated; the
    ///   note is left unchanged in that case
    pub fn update(&mut self, title: String, content: String, tags: Vec<String>) -> Result<()> {
        validate_tags(&tags)?;
        self.title = title;
        self.content = content;
        self.tags = tags;
        self.updated_at = Utc::now();
        self.version += 1;
        Ok(())
    }

    /// Derived tag views for this note's tag paths.
    pub fn tag_views(&self) -> Vec<Tag> {
        self.tags.iter().map(|t| Tag::from_path(t)).collect()
    }
}

fn validate_tags(tags: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for tag in tags {
        Tag::validate_path(tag)?;
        if !seen.insert(tag.as_str()) {
            return Err(Error::InvalidInput(format!("duplicate tag: {tag:?}")));
        }
    }
    Ok(())
}
