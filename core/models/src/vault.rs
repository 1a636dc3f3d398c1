//! Vaults and export metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, password-protected collection of notes sharing one salt.
///
/// The salt is generated once at creation and never rotated; rotating it
/// would invalidate every note encrypted under the old derived key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Unique identifier for the vault.
    pub id: Uuid,
    /// Name of the vault.
    pub name: String,
    /// Description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Printable key-derivation salt, unique per vault.
    pub salt: String,
}

impl Vault {
    /// Create a new vault around a freshly generated salt.
    pub fn new(name: String, description: String, salt: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
            salt,
        }
    }

    /// Rename the vault.
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: String) {
        self.description = description;
        self.updated_at = Utc::now();
    }
}

/// Metadata entry written at the head of an exported archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultMetadata {
    pub vault: Vault,
    pub note_count: usize,
    pub export_date: DateTime<Utc>,
    /// Archive format version, for forward migration.
    pub format_version: String,
}

impl VaultMetadata {
    /// Current archive format version.
    pub const CURRENT_FORMAT: &'static str = "1.0";
}

/// Caller-directed strategy for an id collision during import.
///
/// There is deliberately no "most recent wins" option; guessing intent
/// on personal data is avoided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictResolution {
    /// Discard the existing note; the imported one keeps its id.
    Overwrite,
    /// Keep the existing note and duplicate the imported one under a
    /// fresh id.
    KeepBoth,
    /// Discard the imported note entirely.
    Skip,
}
