//! Local key-value storage backed by a single JSON object file.
//!
//! Every call reads the file again, so separate handles on the same path
//! always observe each other's writes. A file that no longer parses is
//! reported by reads and replaced by the next write.

use replykit_core::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

/// File name used inside the data folder.
pub const STORAGE_FILE: &str = "storage.json";

/// Key-value store persisted as one JSON object.
#[derive(Debug, Clone)]
pub struct KvStore {
    /// Path of the JSON file.
    path: PathBuf,
}

impl KvStore {
    /// Opens the store at `<data_dir>/storage.json`, creating the folder.
    ///
    /// # Errors
    /// Returns an error if the folder cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|err| {
                Error::Storage(format!("Failed to create data directory: {err}"))
            })?;
        }
        Ok(Self {
            path: data_dir.join(STORAGE_FILE),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the file is unreadable or the value has another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.read_all()?;
        entries
            .remove(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }

    /// Stores `value` under `key`.
    ///
    /// Unparseable contents are discarded with a warning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or written.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let mut entries = match self.read_contents()? {
            Some(contents) => parse_entries(&contents).unwrap_or_else(|err| {
                warn!("Discarding unreadable {}: {err}", self.path.display());
                Map::new()
            }),
            None => Map::new(),
        };
        entries.insert(key.to_owned(), serde_json::to_value(value)?);
        self.write_all(&entries)
    }

    /// Loads the whole object; a missing or blank file is an empty object.
    fn read_all(&self) -> Result<Map<String, Value>> {
        self.read_contents()?
            .map_or_else(|| Ok(Map::new()), |contents| parse_entries(&contents))
    }

    /// Raw file contents, `None` when the file is missing or blank.
    fn read_contents(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Storage(format!("Failed to read storage: {err}"))),
        }
    }

    /// Replaces the file through a temp file in the same folder.
    fn write_all(&self, entries: &Map<String, Value>) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let json = serde_json::to_string_pretty(entries)?;

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|err| Error::Storage(format!("Failed to create temp file: {err}")))?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&self.path)
            .map_err(|err| Error::Storage(format!("Failed to replace storage: {err}")))?;
        Ok(())
    }
}

/// Parses the stored JSON object.
fn parse_entries(contents: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(contents)
        .map_err(|err| Error::Storage(format!("Failed to parse storage: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// # Panics
    /// Helper function - panics indicate test environment failure
    fn create_test_store() -> (KvStore, TempDir) {
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("Failed to create temp dir: {err}"),
        };
        let store = match KvStore::open(&temp_dir.path().join("data")) {
            Ok(store) => store,
            Err(err) => panic!("Failed to open store: {err}"),
        };
        (store, temp_dir)
    }

    #[test]
    fn test_missing_key_is_none() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get::<u32>("count").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_and_get() {
        let (store, _temp) = create_test_store();

        store.set("count", &3_u32).unwrap();
        store.set("theme_mode", "dark").unwrap();
        store.set("count", &4_u32).unwrap();
        assert_eq!(store.get::<u32>("count").unwrap(), Some(4));
        assert_eq!(store.get::<String>("theme_mode").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_blank_file_reads_as_empty() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "  \n").unwrap();

        assert_eq!(store.get::<u32>("count").unwrap(), None);
    }

    #[test]
    fn test_handles_share_the_file() {
        let (store, temp) = create_test_store();
        let other = KvStore::open(&temp.path().join("data")).unwrap();

        store.set("greeting", "你好").unwrap();
        assert_eq!(other.get::<String>("greeting").unwrap().as_deref(), Some("你好"));
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.get::<u32>("count"), Err(Error::Storage(_))));
    }

    #[test]
    fn test_write_replaces_corrupt_file() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "{not json").unwrap();

        store.set("count", &1_u32).unwrap();
        assert_eq!(store.get::<u32>("count").unwrap(), Some(1));
    }

    #[test]
    fn test_wrong_shape_is_a_json_error() {
        let (store, _temp) = create_test_store();
        store.set("count", "three").unwrap();

        assert!(matches!(store.get::<u32>("count"), Err(Error::Json(_))));
    }
}
