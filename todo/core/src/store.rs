//! The ordered task collection and its mirroring into a persistence slot.
use crate::slot::{self, PersistenceError, PersistenceSlot};
use crate::task::{Task, TaskDraft, TaskId, ValidationError};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, error, warn};

/// Counts derived from the current collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Completed: {} | Pending: {}",
            self.total, self.completed, self.pending
        )
    }
}

/// Owns the task collection, newest first, and keeps the slot in sync with it.
///
/// Every mutation that changes the collection writes the whole collection
/// back to the slot before returning.
#[derive(Debug)]
pub struct TodoStore<S> {
    tasks: Vec<Task>,
    slot: S,
}

impl<S: PersistenceSlot> TodoStore<S> {
    /// Loads the collection saved in `slot`.
    ///
    /// An empty, unreadable or non-array slot yields an empty store. Invalid
    /// records, and records sharing an id with an earlier one, are dropped
    /// individually.
    pub fn initialize(slot: S) -> Self {
        let tasks = match slot.read() {
            Ok(Some(contents)) => match slot::decode_records(&contents) {
                Ok(records) => dedup_by_id(skip_invalid(records)),
                Err(err) => {
                    warn!(error = %err, "Discarding unreadable saved tasks");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No saved tasks, starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "Cannot read saved tasks, starting empty");
                Vec::new()
            }
        };
        debug!(count = tasks.len(), "Loaded tasks");

        Self { tasks, slot }
    }

    /// Validates `raw_title` as a new task and puts it at the front of the list.
    ///
    /// # Returns
    ///
    /// * `Result<Task, ValidationError>` - A copy of the new task, or why the
    ///   title was rejected. The collection is untouched on error.
    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, raw_title: &str) -> Result<Task, ValidationError> {
        let mut draft = TaskDraft::new(raw_title);
        while self.get(&draft.id).is_some() {
            draft.id = TaskId::generate();
        }

        let task = Task::validate(draft)?;
        self.tasks.insert(0, task.clone());
        debug!(id = %task.id(), "Added task");
        self.persist_or_log();

        Ok(task)
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// Returns whether a task matched. An unknown id is not an error.
    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id() == id) else {
            debug!("No task to toggle");
            return false;
        };

        task.flip_completed();
        debug!(completed = task.is_completed(), "Toggled task");
        self.persist_or_log();
        true
    }

    /// Removes the task with `id`, returning it if it existed.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &TaskId) -> Option<Task> {
        let Some(index) = self.tasks.iter().position(|task| task.id() == id) else {
            debug!("No task to delete");
            return None;
        };

        let removed = self.tasks.remove(index);
        debug!("Deleted task");
        self.persist_or_log();
        Some(removed)
    }

    /// Writes the whole collection to the slot, replacing whatever was there.
    pub fn persist(&mut self) -> Result<(), PersistenceError> {
        let contents = slot::encode(&self.tasks)?;
        self.slot.write(&contents)
    }

    // The in-memory collection stays authoritative when the write fails.
    fn persist_or_log(&mut self) {
        if let Err(err) = self.persist() {
            error!(error = %err, "Failed to persist tasks");
        }
    }
}

impl<S> TodoStore<S> {
    pub fn stats(&self) -> Stats {
        let completed = self.tasks.iter().filter(|task| task.is_completed()).count();
        Stats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }

    /// All tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Tasks whose id starts with `prefix`, in collection order.
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.id().as_str().starts_with(prefix))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }
}

fn skip_invalid(records: Vec<Result<Task, serde_json::Error>>) -> Vec<Task> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match record {
            Ok(task) => Some(task),
            Err(err) => {
                warn!(index, error = %err, "Dropped invalid saved task");
                None
            }
        })
        .collect()
}

fn dedup_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let loaded = tasks.len();
    let mut seen = HashSet::new();
    let tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|task| seen.insert(task.id().clone()))
        .collect();

    if tasks.len() < loaded {
        warn!(
            dropped = loaded - tasks.len(),
            "Dropped saved tasks with duplicate ids"
        );
    }
    tasks
}
