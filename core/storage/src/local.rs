//! Local filesystem storage rooted at a vault directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use inkvault_common::{Error, Result, SafePath};

/// Byte-level I/O confined to a base directory.
///
/// Every relative path is validated as a [`SafePath`] before resolution,
/// so `..` segments and absolute paths are rejected with
/// `Error::PathTraversal` and can never escape the base.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `base_path`, creating it if absent.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| map_io(e, &base_path))?;
        }
        Ok(Self { base_path })
    }

    /// The storage root.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let safe = SafePath::parse(relative_path)?;
        Ok(safe.resolve(&self.base_path))
    }

    /// Write data to a file, atomically.
    ///
    /// Parent directories are created as needed. The bytes land in a
    /// temporary file in the destination directory which is fsynced and
    /// renamed over the final name, so an interrupted write never leaves
    /// a truncated file behind.
    pub fn write_file(&self, relative_path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(relative_path)?;

        let parent = full_path.parent().unwrap_or(&self.base_path);
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| map_io(e, parent))?;
        }

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| map_io(e, parent))?;
        tmp.write_all(data).map_err(|e| map_io(e, &full_path))?;
        tmp.as_file().sync_all().map_err(|e| map_io(e, &full_path))?;
        tmp.persist(&full_path)
            .map_err(|e| map_io(e.error, &full_path))?;

        debug!(path = %relative_path, size = data.len(), "File written");
        Ok(())
    }

    /// Read a file's bytes.
    ///
    /// # Errors
    /// - `NotFound` if the path does not exist
    /// - `PermissionDenied`/`Io` for other OS failures
    pub fn read_file(&self, relative_path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(relative_path)?;
        if !full_path.exists() {
            return Err(Error::NotFound(relative_path.to_string()));
        }
        fs::read(&full_path).map_err(|e| map_io(e, &full_path))
    }

    /// Delete a file.
    ///
    /// # Errors
    /// - `NotFound` if the path does not exist
    pub fn delete_file(&self, relative_path: &str) -> Result<()> {
        let full_path = self.resolve(relative_path)?;
        if !full_path.exists() {
            return Err(Error::NotFound(relative_path.to_string()));
        }
        fs::remove_file(&full_path).map_err(|e| map_io(e, &full_path))?;
        debug!(path = %relative_path, "File deleted");
        Ok(())
    }

    /// Check whether a path exists under the base.
    ///
    /// A path that fails validation does not exist as far as callers are
    /// concerned.
    pub fn exists(&self, relative_path: &str) -> bool {
        self.resolve(relative_path)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    /// Create a directory (and any missing parents).
    pub fn create_dir(&self, relative_path: &str) -> Result<()> {
        let full_path = self.resolve(relative_path)?;
        fs::create_dir_all(&full_path).map_err(|e| map_io(e, &full_path))
    }

    /// List all files under a directory, recursively.
    ///
    /// Returns `/`-separated paths relative to the base. A directory
    /// that does not exist lists as empty rather than erroring.
    pub fn list_files(&self, relative_path: &str) -> Result<Vec<String>> {
        let full_path = self.resolve(relative_path)?;
        if !full_path.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&full_path) {
            let entry = entry.map_err(|e| Error::Io(io::Error::other(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.base_path)
                .map_err(|e| Error::Io(io::Error::other(e)))?;
            let parts: Vec<&str> = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect();
            files.push(parts.join("/"));
        }
        Ok(files)
    }
}

fn map_io(err: io::Error, path: &Path) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.display().to_string()),
        _ => Error::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_read_delete() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path()).unwrap();

        storage.write_file("test.txt", b"Hello, World!").unwrap();
        assert!(storage.exists("test.txt"));
        assert_eq!(storage.read_file("test.txt").unwrap(), b"Hello, World!");

        storage.delete_file("test.txt").unwrap();
        assert!(!storage.exists("test.txt"));
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path()).unwrap();

        assert!(matches!(
            storage.read_file("missing.txt"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            storage.delete_file("missing.txt"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path()).unwrap();

        storage.write_file("f", b"first").unwrap();
        storage.write_file("f", b"second").unwrap();
        assert_eq!(storage.read_file("f").unwrap(), b"second");
    }

    #[test]
    fn test_traversal_rejected() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path()).unwrap();

        for path in ["../escape", "notes/../../x", "/etc/passwd", "a//b"] {
            assert!(
                matches!(storage.write_file(path, b"x"), Err(Error::PathTraversal(_))),
                "{path} was not rejected"
            );
            assert!(matches!(
                storage.read_file(path),
                Err(Error::PathTraversal(_))
            ));
            assert!(!storage.exists(path));
        }
    }

    #[test]
    fn test_nested_write_creates_parents() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path()).unwrap();

        storage.write_file("folder/nested/file.txt", b"nested").unwrap();
        assert!(storage.exists("folder/nested/file.txt"));
    }

    #[test]
    fn test_list_files_recursive_relative() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path()).unwrap();

        storage.write_file("notes/a.json", b"a").unwrap();
        storage.write_file("notes/sub/b.json", b"b").unwrap();
        storage.write_file("vault.json", b"v").unwrap();

        let mut files = storage.list_files("notes").unwrap();
        files.sort();
        assert_eq!(files, vec!["notes/a.json", "notes/sub/b.json"]);

        // Missing directory lists as empty.
        assert!(storage.list_files("nothing").unwrap().is_empty());
    }

    #[test]
    fn test_no_temp_residue_after_write() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path()).unwrap();

        storage.write_file("f.bin", &[0u8; 4096]).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("f.bin")]);
    }
}
