//! Persistence slots the task collection is mirrored into.
//!
//! A slot holds exactly one value: the whole collection encoded as a JSON
//! array of task records. It is read once when the store starts and
//! overwritten wholesale after every change.
use crate::task::Task;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key of the slot when no other name is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Errors that can occur while reading or writing a slot.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to access storage file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Storage(String),
}

/// A single named key-value entry holding the serialized collection.
#[cfg_attr(test, mockall::automock)]
pub trait PersistenceSlot {
    /// Reads the stored value.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - Nothing has been stored yet
    /// * `Ok(Some(contents))` - The last value written
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replaces the stored value with `contents`.
    fn write(&mut self, contents: &str) -> Result<(), PersistenceError>;
}

/// Encodes the collection into the slot's value format.
pub fn encode(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Decodes a slot value. Fails if any record is malformed or invalid.
pub fn decode(contents: &str) -> Result<Vec<Task>, serde_json::Error> {
    serde_json::from_str(contents)
}

/// Decodes a slot value record by record.
///
/// Fails only when the value is not a JSON array; each record that is
/// malformed or invalid gets its own error so it can be skipped.
pub fn decode_records(
    contents: &str,
) -> Result<Vec<Result<Task, serde_json::Error>>, serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_str(contents)?;
    Ok(records.into_iter().map(serde_json::from_value).collect())
}

/// Slot kept in process memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySlot {
    contents: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds `contents`, as if written by an earlier run.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl PersistenceSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistenceError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}

/// Slot backed by a JSON file on disk.
///
/// A missing file reads as an empty slot. Parent directories are created on
/// the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(feature = "web")]
mod local_storage {
    use super::{DEFAULT_STORAGE_KEY, PersistenceError, PersistenceSlot};
    use gloo_storage::{LocalStorage, Storage};

    /// Slot stored in the browser's `localStorage`, scoped to the page origin.
    ///
    /// `read` and `write` need a browser window; outside wasm only their
    /// compilation is checked, the key handling is unit tested.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LocalStorageSlot {
        key: String,
    }

    impl LocalStorageSlot {
        pub fn new(key: impl ToString) -> Self {
            Self {
                key: key.to_string(),
            }
        }

        pub fn key(&self) -> &str {
            &self.key
        }
    }

    impl Default for LocalStorageSlot {
        fn default() -> Self {
            Self::new(DEFAULT_STORAGE_KEY)
        }
    }

    impl PersistenceSlot for LocalStorageSlot {
        fn read(&self) -> Result<Option<String>, PersistenceError> {
            LocalStorage::raw()
                .get_item(&self.key)
                .map_err(|err| PersistenceError::Storage(format!("{err:?}")))
        }

        fn write(&mut self, contents: &str) -> Result<(), PersistenceError> {
            LocalStorage::raw()
                .set_item(&self.key, contents)
                .map_err(|err| PersistenceError::Storage(format!("{err:?}")))
        }
    }
}

#[cfg(feature = "web")]
pub use local_storage::LocalStorageSlot;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskDraft, TaskId};
    use assert_fs::prelude::*;

    fn task(id: &str, title: &str, completed: bool) -> Task {
        let mut draft = TaskDraft::new(title);
        draft.id = TaskId::from(id);
        draft.completed = completed;
        Task::validate(draft).unwrap()
    }

    mod codec_tests {
        use super::*;

        #[test]
        fn encode_then_decode_preserves_order_and_fields() {
            // Arrange
            let tasks = vec![task("b", "Second", true), task("a", "First", false)];

            // Act
            let decoded = decode(&encode(&tasks).unwrap()).unwrap();

            // Assert
            assert_eq!(decoded, tasks);
        }

        #[test]
        fn empty_collection_encodes_as_empty_array() {
            assert_eq!(encode(&[]).unwrap(), "[]");
        }

        #[test]
        fn decode_rejects_non_array_values() {
            assert!(decode(r#"{"id":"a"}"#).is_err());
            assert!(decode("not json").is_err());
            assert!(decode("").is_err());
        }

        #[test]
        fn decode_records_isolates_invalid_records() {
            // Arrange
            let json = r#"[
                {"id":"a","title":"Good","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"},
                {"id":"b","title":"","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"},
                {"id":"c","title":"Bad date","completed":false,"createdAt":"someday"},
                "not a record"
            ]"#;

            // Act
            let records = decode_records(json).unwrap();

            // Assert
            assert_eq!(records.len(), 4);
            assert_eq!(records[0].as_ref().unwrap().title(), "Good");
            assert!(records[1..].iter().all(Result::is_err));
        }

        #[test]
        fn decode_records_rejects_non_array_values() {
            assert!(decode_records(r#"{"id":"a"}"#).is_err());
            assert!(decode_records("not json").is_err());
        }

        #[test]
        fn decode_rejects_array_with_an_invalid_record() {
            let long_title = "x".repeat(101);
            let json = format!(
                r#"[{{"id":"a","title":"{long_title}","completed":false,"createdAt":"2024-01-01T00:00:00Z"}}]"#
            );

            let result = decode(&json);

            assert!(result.is_err());
        }
    }

    mod memory_slot_tests {
        use super::*;

        #[test]
        fn new_slot_is_empty() {
            let slot = MemorySlot::new();

            assert_eq!(slot.read().unwrap(), None);
        }

        #[test]
        fn write_overwrites_previous_value() {
            let mut slot = MemorySlot::with_contents("[1]");

            slot.write("[2]").unwrap();

            assert_eq!(slot.read().unwrap().as_deref(), Some("[2]"));
            assert_eq!(slot.contents(), Some("[2]"));
        }
    }

    mod file_slot_tests {
        use super::*;

        #[test]
        fn missing_file_reads_as_empty() {
            let dir = assert_fs::TempDir::new().unwrap();
            let slot = FileSlot::new(dir.child("todos.json").path());

            assert_eq!(slot.read().unwrap(), None);
        }

        #[test]
        fn write_creates_parent_directories() {
            // Arrange
            let dir = assert_fs::TempDir::new().unwrap();
            let file = dir.child("nested/data/todos.json");
            let mut slot = FileSlot::new(file.path());

            // Act
            slot.write("[]").unwrap();

            // Assert
            file.assert("[]");
            assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
        }

        #[test]
        fn write_replaces_existing_contents() {
            // Arrange
            let dir = assert_fs::TempDir::new().unwrap();
            let file = dir.child("todos.json");
            file.write_str("[\"old value that is longer\"]").unwrap();
            let mut slot = FileSlot::new(file.path());

            // Act
            slot.write("[]").unwrap();

            // Assert
            file.assert("[]");
        }

        #[test]
        fn unreadable_path_is_an_error() {
            let dir = assert_fs::TempDir::new().unwrap();
            // A directory cannot be read as a file
            let slot = FileSlot::new(dir.path());

            let result = slot.read();

            assert!(matches!(result, Err(PersistenceError::Io(_))));
        }
    }
}
