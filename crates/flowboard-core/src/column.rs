//! Column data model for flowboard

use crate::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An ordered stage on the board holding tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,

    pub title: String,

    /// On-screen order, top to bottom
    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
            archived_at: None,
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Archive the column and every task in it with the same timestamp.
    pub fn archive(&mut self, at: DateTime<Utc>) {
        self.archived_at = Some(at);
        for task in &mut self.tasks {
            task.archive(at);
        }
    }

    /// Unarchive the column and every task in it.
    pub fn unarchive(&mut self) {
        self.archived_at = None;
        for task in &mut self.tasks {
            task.unarchive();
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.task_index(task_id).is_some()
    }

    pub fn apply(&mut self, patch: &ColumnPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.tasks.len())
    }
}

/// Partial update for a column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ColumnPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}
