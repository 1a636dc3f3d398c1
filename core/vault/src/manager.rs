//! Vault persistence and archive export/import.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::conflict::merge_notes;
use inkvault_common::{Error, Result};
use inkvault_crypto::EncryptionManager;
use inkvault_models::{ConflictResolution, Note, Vault, VaultMetadata};
use inkvault_storage::FileStorage;

/// Metadata entry name inside an exported archive.
const METADATA_ENTRY: &str = "metadata.json";

/// Prefix of per-note entries inside an exported archive.
const NOTES_ENTRY_PREFIX: &str = "notes/";

/// Vault metadata file name under the storage root.
const VAULT_FILENAME: &str = "vault.json";

/// Directory holding one encrypted blob per note.
const NOTES_DIRNAME: &str = "notes";

/// Orchestrates encryption and storage for one vault's note set.
///
/// On disk a vault is `vault.json` (plaintext metadata — the salt is
/// non-secret and must be readable before a key exists) plus
/// `notes/<id>.json`, each holding one optionally-encrypted serialized
/// note. Export/import move the same shapes through a zip archive.
pub struct VaultManager {
    storage: FileStorage,
}

impl VaultManager {
    /// Create a manager over the given storage root.
    pub fn new(storage: FileStorage) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    fn note_path(id: Uuid) -> String {
        format!("{NOTES_ENTRY_PREFIX}{id}.json")
    }

    /// Persist vault metadata as `vault.json`.
    pub fn save_vault(&self, vault: &Vault) -> Result<()> {
        let json = serde_json::to_vec_pretty(vault)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        self.storage.write_file(VAULT_FILENAME, &json)
    }

    /// Load vault metadata from `vault.json`.
    pub fn load_vault(&self) -> Result<Vault> {
        let bytes = self.storage.read_file(VAULT_FILENAME)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Persist one note under `notes/<id>.json`.
    ///
    /// With an encryption manager supplied the stored blob is
    /// `nonce ‖ ciphertext ‖ tag` over the serialized note; without one
    /// the serialized note is stored as-is.
    pub fn save_note(&self, note: &Note, encryption: Option<&EncryptionManager>) -> Result<()> {
        let json =
            serde_json::to_vec_pretty(note).map_err(|e| Error::Serialization(e.to_string()))?;
        let data = match encryption {
            Some(enc) => enc.encrypt(&json)?,
            None => json,
        };
        self.storage.write_file(&Self::note_path(note.id), &data)?;
        debug!(note_id = %note.id, encrypted = encryption.is_some(), "Note saved");
        Ok(())
    }

    /// Load and decrypt one note.
    pub fn load_note(&self, id: Uuid, encryption: Option<&EncryptionManager>) -> Result<Note> {
        let data = self.storage.read_file(&Self::note_path(id))?;
        let json = match encryption {
            Some(enc) => enc.decrypt(&data)?,
            None => data,
        };
        serde_json::from_slice(&json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Delete one note's blob. The caller is responsible for removing
    /// the note from any search index as well.
    pub fn delete_note(&self, id: Uuid) -> Result<()> {
        self.storage.delete_file(&Self::note_path(id))
    }

    /// Ids of all persisted notes, in no particular order.
    pub fn list_note_ids(&self) -> Result<Vec<Uuid>> {
        let files = self.storage.list_files(NOTES_DIRNAME)?;
        Ok(files
            .iter()
            .filter_map(|f| {
                f.strip_prefix(NOTES_ENTRY_PREFIX)?
                    .strip_suffix(".json")?
                    .parse()
                    .ok()
            })
            .collect())
    }

    /// Export a vault and its notes to a single zip archive.
    ///
    /// The archive holds `metadata.json` plus one `notes/<id>.json`
    /// entry per note. With encryption supplied, the metadata blob and
    /// every note entry are sealed independently, so one corrupted entry
    /// cannot take the others with it.
    ///
    /// The archive is assembled in a temporary file next to
    /// `output_path` and renamed into place only on full success; no
    /// failure leaves a partial archive at the final path.
    pub fn export_vault(
        &self,
        vault: &Vault,
        notes: &[Note],
        output_path: &Path,
        encryption: Option<&EncryptionManager>,
    ) -> Result<()> {
        let parent = match output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(parent)?;

        let mut zip = ZipWriter::new(tmp);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let metadata = VaultMetadata {
            vault: vault.clone(),
            note_count: notes.len(),
            export_date: Utc::now(),
            format_version: VaultMetadata::CURRENT_FORMAT.to_string(),
        };
        let metadata_json = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        let metadata_body = match encryption {
            Some(enc) => enc.encrypt(&metadata_json)?,
            None => metadata_json,
        };
        zip.start_file(METADATA_ENTRY, options).map_err(map_zip)?;
        zip.write_all(&metadata_body)?;

        for note in notes {
            let note_json = serde_json::to_vec_pretty(note)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            let body = match encryption {
                Some(enc) => enc.encrypt(&note_json)?,
                None => note_json,
            };
            zip.start_file(Self::note_path(note.id), options)
                .map_err(map_zip)?;
            zip.write_all(&body)?;
        }

        let tmp = zip.finish().map_err(map_zip)?;
        tmp.as_file().sync_all()?;
        tmp.persist(output_path).map_err(|e| Error::Io(e.error))?;

        info!(
            vault_id = %vault.id,
            notes = notes.len(),
            encrypted = encryption.is_some(),
            path = %output_path.display(),
            "Vault exported"
        );
        Ok(())
    }

    /// Import a vault archive and merge its notes with an existing set.
    ///
    /// The metadata entry is read and decrypted before any note entry is
    /// touched, so a wrong password fails up front instead of midway
    /// through the note set. Any single note entry that fails to decrypt
    /// or parse aborts the whole import — a silently partial import is
    /// never produced.
    ///
    /// Returns the archived vault and the merged union of
    /// `existing_notes` and the imported notes, with id collisions
    /// settled by `resolution`.
    pub fn import_vault(
        &self,
        input_path: &Path,
        encryption: Option<&EncryptionManager>,
        existing_notes: &[Note],
        resolution: ConflictResolution,
    ) -> Result<(Vault, Vec<Note>)> {
        let file = File::open(input_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(input_path.display().to_string()),
            _ => Error::Io(e),
        })?;
        let mut zip = ZipArchive::new(file).map_err(map_zip)?;

        let metadata = Self::read_metadata(&mut zip, encryption)?;
        debug!(vault_id = %metadata.vault.id, declared = metadata.note_count, "Archive metadata read");

        let mut imported = Vec::new();
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(map_zip)?;
            let name = entry.name().to_string();
            if !name.starts_with(NOTES_ENTRY_PREFIX) || !name.ends_with(".json") {
                continue;
            }

            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;

            let json = match encryption {
                Some(enc) => enc.decrypt(&data)?,
                None => data,
            };
            let note: Note = serde_json::from_slice(&json)
                .map_err(|e| Error::Serialization(format!("{name}: {e}")))?;
            imported.push(note);
        }

        info!(
            vault_id = %metadata.vault.id,
            imported = imported.len(),
            existing = existing_notes.len(),
            "Vault imported"
        );

        let merged = merge_notes(existing_notes, imported, resolution);
        Ok((metadata.vault, merged))
    }

    fn read_metadata(
        zip: &mut ZipArchive<File>,
        encryption: Option<&EncryptionManager>,
    ) -> Result<VaultMetadata> {
        let mut entry = match zip.by_name(METADATA_ENTRY) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(Error::MetadataMissing),
            Err(e) => return Err(map_zip(e)),
        };

        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;

        let json = match encryption {
            Some(enc) => enc.decrypt(&data)?,
            None => data,
        };
        serde_json::from_slice(&json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

fn map_zip(err: ZipError) -> Error {
    match err {
        ZipError::Io(e) => Error::Io(e),
        other => Error::ArchiveCorrupt(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkvault_crypto::{KdfParams, Salt};
    use tempfile::tempdir;

    fn manager(dir: &Path) -> VaultManager {
        VaultManager::new(FileStorage::new(dir).unwrap())
    }

    fn encryption(password: &str, salt: &Salt) -> EncryptionManager {
        EncryptionManager::with_params(password, salt, &KdfParams::moderate()).unwrap()
    }

    fn sample_notes() -> Vec<Note> {
        vec![
            Note::new(
                "Note 1".to_string(),
                "Content 1".to_string(),
                vec!["work/project".to_string()],
            )
            .unwrap(),
            Note::new("Note 2".to_string(), "Content 2".to_string(), vec![]).unwrap(),
        ]
    }

    #[test]
    fn test_save_load_note_encrypted() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());
        let salt = EncryptionManager::generate_salt();
        let enc = encryption("pw", &salt);

        let note = sample_notes().remove(0);
        mgr.save_note(&note, Some(&enc)).unwrap();

        // The blob on disk is not plaintext JSON.
        let raw = mgr.storage().read_file(&format!("notes/{}.json", note.id)).unwrap();
        assert!(serde_json::from_slice::<Note>(&raw).is_err());

        let loaded = mgr.load_note(note.id, Some(&enc)).unwrap();
        assert_eq!(loaded, note);

        // Wrong password fails closed.
        let wrong = encryption("other", &salt);
        assert!(matches!(
            mgr.load_note(note.id, Some(&wrong)),
            Err(Error::Authentication)
        ));
    }

    #[test]
    fn test_list_and_delete_notes() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let notes = sample_notes();
        for note in &notes {
            mgr.save_note(note, None).unwrap();
        }

        let mut ids = mgr.list_note_ids().unwrap();
        ids.sort();
        let mut expected: Vec<Uuid> = notes.iter().map(|n| n.id).collect();
        expected.sort();
        assert_eq!(ids, expected);

        mgr.delete_note(notes[0].id).unwrap();
        assert_eq!(mgr.list_note_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_save_load_vault_metadata() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let vault = Vault::new("V".to_string(), "D".to_string(), "salt".to_string());
        mgr.save_vault(&vault).unwrap();
        assert_eq!(mgr.load_vault().unwrap(), vault);
    }

    #[test]
    fn test_export_import_round_trip_plain() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let vault = Vault::new("Test Vault".to_string(), "Desc".to_string(), "s".to_string());
        let notes = sample_notes();
        let archive = temp.path().join("export.zip");

        mgr.export_vault(&vault, &notes, &archive, None).unwrap();
        let (imported_vault, imported_notes) = mgr
            .import_vault(&archive, None, &[], ConflictResolution::Overwrite)
            .unwrap();

        assert_eq!(imported_vault, vault);
        let mut got = imported_notes;
        got.sort_by_key(|n| n.id);
        let mut want = notes;
        want.sort_by_key(|n| n.id);
        assert_eq!(got, want);
    }

    #[test]
    fn test_export_import_round_trip_encrypted() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let salt = EncryptionManager::generate_salt();
        let enc = encryption("pw", &salt);
        let vault = Vault::new("V".to_string(), String::new(), salt.as_str().to_string());
        let notes = sample_notes();
        let archive = temp.path().join("export.zip");

        mgr.export_vault(&vault, &notes, &archive, Some(&enc)).unwrap();

        let (imported_vault, imported_notes) = mgr
            .import_vault(&archive, Some(&enc), &[], ConflictResolution::Overwrite)
            .unwrap();
        assert_eq!(imported_vault.id, vault.id);
        assert_eq!(imported_notes.len(), notes.len());
    }

    #[test]
    fn test_import_wrong_password_fails_before_notes() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let salt = EncryptionManager::generate_salt();
        let enc = encryption("pw", &salt);
        let vault = Vault::new("V".to_string(), String::new(), salt.as_str().to_string());
        let archive = temp.path().join("export.zip");
        mgr.export_vault(&vault, &sample_notes(), &archive, Some(&enc))
            .unwrap();

        let wrong = encryption("wrong", &salt);
        let result = mgr.import_vault(&archive, Some(&wrong), &[], ConflictResolution::Overwrite);
        assert!(matches!(result, Err(Error::Authentication)));
    }

    #[test]
    fn test_import_merges_with_existing() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let vault = Vault::new("V".to_string(), String::new(), "s".to_string());
        let shared = sample_notes().remove(0);
        let local_only = Note::new("Local".to_string(), "kept".to_string(), vec![]).unwrap();
        let archive = temp.path().join("export.zip");

        mgr.export_vault(&vault, &[shared.clone()], &archive, None)
            .unwrap();

        let existing = vec![local_only.clone(), shared.clone()];
        let (_, merged) = mgr
            .import_vault(&archive, None, &existing, ConflictResolution::KeepBoth)
            .unwrap();

        // local-only + existing shared + duplicated import under a new id
        assert_eq!(merged.len(), 3);
        assert!(merged.contains(&local_only));
        assert!(merged.contains(&shared));
        assert!(merged.iter().any(|n| n.id != shared.id && n.title == shared.title));
    }

    #[test]
    fn test_import_missing_metadata() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        // An archive with a note entry but no metadata.json.
        let path = temp.path().join("bad.zip");
        let file = File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file("notes/whatever.json", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"{}").unwrap();
        zip.finish().unwrap();

        let result = mgr.import_vault(&path, None, &[], ConflictResolution::Skip);
        assert!(matches!(result, Err(Error::MetadataMissing)));
    }

    #[test]
    fn test_import_garbage_archive() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let path = temp.path().join("garbage.zip");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let result = mgr.import_vault(&path, None, &[], ConflictResolution::Skip);
        assert!(matches!(result, Err(Error::ArchiveCorrupt(_))));
    }

    #[test]
    fn test_failed_export_leaves_no_archive() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let vault = Vault::new("V".to_string(), String::new(), "s".to_string());
        let target = temp.path().join("missing-dir").join("export.zip");

        assert!(mgr.export_vault(&vault, &[], &target, None).is_err());
        assert!(!target.exists());
    }

    #[test]
    fn test_corrupted_note_entry_aborts_import() {
        let temp = tempdir().unwrap();
        let mgr = manager(temp.path());

        let salt = EncryptionManager::generate_salt();
        let enc = encryption("pw", &salt);
        let vault = Vault::new("V".to_string(), String::new(), salt.as_str().to_string());
        let note = sample_notes().remove(0);

        // Hand-build an archive whose metadata is fine but whose note
        // entry is mangled ciphertext.
        let metadata = VaultMetadata {
            vault: vault.clone(),
            note_count: 1,
            export_date: Utc::now(),
            format_version: VaultMetadata::CURRENT_FORMAT.to_string(),
        };
        let path = temp.path().join("corrupt.zip");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();

        let metadata_body = enc
            .encrypt(&serde_json::to_vec(&metadata).unwrap())
            .unwrap();
        zip.start_file(METADATA_ENTRY, options).unwrap();
        zip.write_all(&metadata_body).unwrap();

        let mut note_body = enc.encrypt(&serde_json::to_vec(&note).unwrap()).unwrap();
        let last = note_body.len() - 1;
        note_body[last] ^= 0xFF;
        zip.start_file(format!("notes/{}.json", note.id), options).unwrap();
        zip.write_all(&note_body).unwrap();
        zip.finish().unwrap();

        let result = mgr.import_vault(&path, Some(&enc), &[], ConflictResolution::Skip);
        assert!(matches!(result, Err(Error::Authentication)));
    }
}
