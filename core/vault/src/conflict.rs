//! Conflict detection and resolution between note sets.
//!
//! A conflict is an exact `id` collision between an existing and an
//! imported note — nothing else. Content similarity, matching titles or
//! overlapping tags never constitute a conflict, and no strategy guesses
//! intent from `updated_at` or `version`.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use inkvault_models::{ConflictResolution, Note};

/// Find every (existing, imported) pair sharing an id.
///
/// Existing notes are indexed by id first, so detection is O(n+m).
/// Pairs come back in imported order.
pub fn detect_conflicts(existing_notes: &[Note], imported_notes: &[Note]) -> Vec<(Note, Note)> {
    let by_id: HashMap<Uuid, &Note> = existing_notes.iter().map(|n| (n.id, n)).collect();

    imported_notes
        .iter()
        .filter_map(|imported| {
            by_id
                .get(&imported.id)
                .map(|existing| ((*existing).clone(), imported.clone()))
        })
        .collect()
}

/// Apply a caller-chosen strategy to one conflicting pair.
///
/// - `Overwrite`: the imported note wins, keeping its original id
/// - `KeepBoth`: the existing note is untouched and the imported note is
///   duplicated under a fresh id, leaving no collision
/// - `Skip`: the imported note is discarded
pub fn resolve_conflict(
    existing: Note,
    imported: Note,
    resolution: ConflictResolution,
) -> Vec<Note> {
    match resolution {
        ConflictResolution::Overwrite => vec![imported],
        ConflictResolution::KeepBoth => {
            let mut copy = imported;
            copy.id = Uuid::new_v4();
            vec![existing, copy]
        }
        ConflictResolution::Skip => vec![existing],
    }
}

/// Merge an imported note set into an existing one.
///
/// The result is the union of non-colliding existing notes, non-colliding
/// imported notes, and the resolved output of every conflicting pair.
/// Order is unspecified.
pub fn merge_notes(
    existing_notes: &[Note],
    imported_notes: Vec<Note>,
    resolution: ConflictResolution,
) -> Vec<Note> {
    let imported_ids: HashSet<Uuid> = imported_notes.iter().map(|n| n.id).collect();
    let by_id: HashMap<Uuid, &Note> = existing_notes.iter().map(|n| (n.id, n)).collect();

    let mut merged: Vec<Note> = existing_notes
        .iter()
        .filter(|n| !imported_ids.contains(&n.id))
        .cloned()
        .collect();

    for imported in imported_notes {
        match by_id.get(&imported.id) {
            Some(existing) => {
                merged.extend(resolve_conflict((*existing).clone(), imported, resolution));
            }
            None => merged.push(imported),
        }
    }

    merged
}
