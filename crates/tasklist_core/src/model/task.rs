//! Task domain model.
//!
//! # Responsibility
//! - Define the task record owned by a task list.
//! - Validate user-provided task input before it reaches the store.
//!
//! # Invariants
//! - `id` is stable and unique inside the owning list.
//! - New tasks always start with `completed = false`.
//! - Legacy wire spellings (`dueDate`, capitalized priorities) are accepted
//!   on read; writes always use the canonical names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Kept as a string so ids written by earlier app versions load unchanged.
pub type TaskId = String;

/// Maximum task title length in characters.
pub const TASK_TITLE_MAX_CHARS: usize = 100;
/// Maximum task description length in characters.
pub const TASK_DESCRIPTION_MAX_CHARS: usize = 500;

/// Optional urgency marker for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl TaskPriority {
    /// Returns the canonical wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// One actionable item inside a [`crate::TaskList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free text; empty when the user left it blank.
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(
        default,
        alias = "dueDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<DateTime<Utc>>,
}

impl Task {
    /// Materializes a new task from input with a generated id.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    pub fn from_new(input: NewTask) -> Self {
        Self {
            id: generate_task_id(),
            title: input.title,
            description: input.description,
            completed: false,
            priority: input.priority,
            deadline: input.deadline,
        }
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

/// Task input without identity ("task without id").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Creates input with a title and empty optional fields.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates user input limits.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyTitle`] when the title is blank.
    /// - [`TaskValidationError::TitleTooLong`] past [`TASK_TITLE_MAX_CHARS`].
    /// - [`TaskValidationError::DescriptionTooLong`] past
    ///   [`TASK_DESCRIPTION_MAX_CHARS`].
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        let title_chars = self.title.chars().count();
        if title_chars > TASK_TITLE_MAX_CHARS {
            return Err(TaskValidationError::TitleTooLong {
                actual: title_chars,
                max: TASK_TITLE_MAX_CHARS,
            });
        }
        let description_chars = self.description.chars().count();
        if description_chars > TASK_DESCRIPTION_MAX_CHARS {
            return Err(TaskValidationError::DescriptionTooLong {
                actual: description_chars,
                max: TASK_DESCRIPTION_MAX_CHARS,
            });
        }
        Ok(())
    }
}

/// Rejected task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    TitleTooLong { actual: usize, max: usize },
    DescriptionTooLong { actual: usize, max: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::TitleTooLong { actual, max } => {
                write!(f, "task title has {actual} characters; max is {max}")
            }
            Self::DescriptionTooLong { actual, max } => {
                write!(f, "task description has {actual} characters; max is {max}")
            }
        }
    }
}

impl Error for TaskValidationError {}

pub(crate) fn generate_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}
