//! Task records and the rules for constructing a valid one.
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Shortest title accepted, in characters.
pub const MIN_TITLE_LEN: usize = 1;
/// Longest title accepted, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Reasons a draft cannot become a [`Task`].
///
/// The display text is meant to be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title too long")]
    TitleTooLong,
    #[error("Id is required")]
    MissingId,
}

/// Opaque identifier of a task.
///
/// New ids are random UUIDs, but any string read back from storage is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate task with every field populated but nothing checked yet.
///
/// This is also the shape of a record in storage, so persisted tasks go
/// through the same validation as new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TaskDraft {
    /// Drafts a new, not yet completed task created right now.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            completed: false,
            created_at: Utc::now().trunc_subsecs(timestamp::PRECISION),
        }
    }
}

/// A validated task.
///
/// Only the completion flag ever changes after construction, and only
/// through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskDraft")]
pub struct Task {
    id: TaskId,
    title: String,
    completed: bool,
    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,
}

impl Task {
    /// Checks a draft and turns it into a task.
    ///
    /// # Returns
    ///
    /// * `Result<Task, ValidationError>` - The task, or the first rule the draft breaks
    pub fn validate(draft: TaskDraft) -> Result<Self, ValidationError> {
        let title_len = draft.title.chars().count();
        if title_len < MIN_TITLE_LEN {
            return Err(ValidationError::TitleRequired);
        }
        if title_len > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong);
        }
        if draft.id.as_str().is_empty() {
            return Err(ValidationError::MissingId);
        }

        Ok(Self {
            id: draft.id,
            title: draft.title,
            completed: draft.completed,
            created_at: draft.created_at.trunc_subsecs(timestamp::PRECISION),
        })
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn flip_completed(&mut self) {
        self.completed = !self.completed;
    }
}

impl TryFrom<TaskDraft> for Task {
    type Error = ValidationError;

    fn try_from(draft: TaskDraft) -> Result<Self, Self::Error> {
        Task::validate(draft)
    }
}

/// `createdAt` on the wire: RFC 3339 in UTC with millisecond precision, the
/// same shape JavaScript's `toISOString` produces.
///
/// Reading also accepts timestamps without an offset (taken as UTC) and bare
/// dates (midnight UTC).
mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Sub-second digits kept on task timestamps.
    pub(super) const PRECISION: u16 = 3;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(parsed.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
