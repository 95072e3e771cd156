use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::dates;

/// Task identifier, assigned once at creation.
pub type TaskId = String;

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    School,
    Personal,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::School, Category::Personal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::School => "school",
            Category::Personal => "personal",
        }
    }

    /// Label used by the form selector.
    pub fn label(&self) -> &'static str {
        match self {
            Category::School => "School Work",
            Category::Personal => "Personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "school" => Ok(Category::School),
            "personal" => Ok(Category::Personal),
            other => Err(format!("unknown category '{}' (expected school or personal)", other)),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{}' (expected low, medium or high)", other)),
        }
    }
}

/// A persisted task.
///
/// Field names are serialized in camelCase so the stored blob keeps the
/// `dueDate` / `createdAt` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "dates::due_date")]
    pub due_date: NaiveDate,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "dates::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a task from a validated draft. Only `core::ops` calls this.
    pub(crate) fn from_draft(id: TaskId, draft: &ValidDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            due_date: draft.due_date,
            category: draft.category,
            priority: draft.priority,
            completed: draft.completed,
            created_at,
        }
    }

    /// Replace every mutable field, keeping `id` and `created_at`.
    pub(crate) fn apply(&mut self, draft: &ValidDraft) {
        self.title = draft.title.clone();
        self.description = draft.description.clone();
        self.due_date = draft.due_date;
        self.category = draft.category;
        self.priority = draft.priority;
        self.completed = draft.completed;
    }

    /// Editable copy of this task, used to pre-fill the edit form.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: Some(self.due_date),
            category: self.category,
            priority: self.priority,
            completed: self.completed,
        }
    }
}

/// Raw form input for create/update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub category: Category,
    pub priority: Priority,
    pub completed: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            due_date: Some(due_date),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Trim text fields and check the required ones.
    pub fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let due_date = self.due_date.ok_or(ValidationError::MissingDueDate)?;

        Ok(ValidDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            due_date,
            category: self.category,
            priority: self.priority,
            completed: self.completed,
        })
    }
}

/// A draft that passed validation: trimmed, non-empty title and a due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    title: String,
    description: String,
    due_date: NaiveDate,
    category: Category,
    priority: Priority,
    completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Task title is required")]
    EmptyTitle,
    #[error("Due date is required")]
    MissingDueDate,
}
