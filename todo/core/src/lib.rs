//! Core domain model and store for the todo list.
//!
//! A [`Task`] can only be built through validation, a [`TodoStore`] owns the
//! ordered collection of tasks, and a [`PersistenceSlot`] is the single named
//! entry the collection is mirrored into after every change.
pub mod slot;
pub mod store;
pub mod task;

#[cfg(feature = "web")]
pub use slot::LocalStorageSlot;
pub use slot::{DEFAULT_STORAGE_KEY, FileSlot, MemorySlot, PersistenceError, PersistenceSlot};
pub use store::{Stats, TodoStore};
pub use task::{MAX_TITLE_LEN, MIN_TITLE_LEN, Task, TaskDraft, TaskId, ValidationError};
