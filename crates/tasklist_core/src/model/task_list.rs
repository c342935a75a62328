//! Task list domain model.
//!
//! # Responsibility
//! - Define the list record and its fixed/custom categories.
//! - Own task lookup and mutation helpers used by the store.
//!
//! # Invariants
//! - A list exclusively owns its tasks; removing a list drops them.
//! - At most one list per fixed kind is expected, but not enforced here.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque list identifier.
pub type ListId = String;

/// Maximum list name length in characters.
pub const LIST_NAME_MAX_CHARS: usize = 100;

/// List category. Serialized as `type` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Daily,
    Weekly,
    Monthly,
    /// User-created list; any number may exist.
    Custom,
}

impl ListKind {
    /// Kinds that the initialization routine guarantees, in creation order.
    pub const FIXED: [ListKind; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        !matches!(self, Self::Custom)
    }

    /// Display name given to the default list of a fixed kind.
    pub fn default_name(self) -> Option<&'static str> {
        match self {
            Self::Daily => Some("Daily Tasks"),
            Self::Weekly => Some("Weekly Tasks"),
            Self::Monthly => Some("Monthly Tasks"),
            Self::Custom => None,
        }
    }
}

/// Named, ordered collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: ListId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ListKind,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Materializes a list from input with a generated id.
    ///
    /// Tasks supplied with the input are kept as-is.
    pub fn from_new(input: NewTaskList) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            kind: input.kind,
            tasks: input.tasks,
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    /// Removes one task by id; returns whether anything was removed.
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        self.tasks.len() != before
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }
}

/// List input without identity ("list without id").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskList {
    pub name: String,
    pub kind: ListKind,
    pub tasks: Vec<Task>,
}

impl NewTaskList {
    /// Creates an empty list input.
    pub fn new(name: impl Into<String>, kind: ListKind) -> Self {
        Self {
            name: name.into(),
            kind,
            tasks: Vec::new(),
        }
    }

    /// Creates the default input for a fixed kind.
    ///
    /// Returns `None` for [`ListKind::Custom`].
    pub fn default_for(kind: ListKind) -> Option<Self> {
        kind.default_name().map(|name| Self::new(name, kind))
    }

    /// Validates the list name.
    ///
    /// # Errors
    /// - [`ListValidationError::EmptyName`] when the name is blank.
    /// - [`ListValidationError::NameTooLong`] past [`LIST_NAME_MAX_CHARS`].
    pub fn validate(&self) -> Result<(), ListValidationError> {
        if self.name.trim().is_empty() {
            return Err(ListValidationError::EmptyName);
        }
        let chars = self.name.chars().count();
        if chars > LIST_NAME_MAX_CHARS {
            return Err(ListValidationError::NameTooLong {
                actual: chars,
                max: LIST_NAME_MAX_CHARS,
            });
        }
        Ok(())
    }
}

/// Rejected list input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListValidationError {
    EmptyName,
    NameTooLong { actual: usize, max: usize },
}

impl Display for ListValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "list name cannot be empty"),
            Self::NameTooLong { actual, max } => {
                write!(f, "list name has {actual} characters; max is {max}")
            }
        }
    }
}

impl Error for ListValidationError {}

#[cfg(test)]
mod tests {
    use super::{ListKind, NewTaskList};

    #[test]
    fn default_for_custom_is_none() {
        assert!(NewTaskList::default_for(ListKind::Custom).is_none());
        let daily = NewTaskList::default_for(ListKind::Daily).unwrap();
        assert_eq!(daily.name, "Daily Tasks");
        assert!(daily.tasks.is_empty());
    }

    #[test]
    fn fixed_kinds_exclude_custom() {
        assert!(ListKind::FIXED.iter().all(|kind| kind.is_fixed()));
        assert!(!ListKind::Custom.is_fixed());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(NewTaskList::new("   ", ListKind::Custom).validate().is_err());
        assert!(NewTaskList::new("Groceries", ListKind::Custom)
            .validate()
            .is_ok());
    }
}
