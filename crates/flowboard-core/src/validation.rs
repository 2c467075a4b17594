//! Form-level validation
//!
//! The stores trust their callers; forms run these checks before issuing a
//! command. Lengths count chars, not bytes.

use crate::{Error, Priority, Result, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TASK_TITLE_MAX: usize = 30;
pub const TASK_DESCRIPTION_MAX: usize = 250;
pub const COLUMN_TITLE_MAX: usize = 20;
pub const USER_NAME_MAX: usize = 30;

fn check_length(field: &'static str, label: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len == 0 {
        return Err(Error::Validation {
            field,
            message: format!("{label} is required"),
        });
    }
    if len > max {
        return Err(Error::Validation {
            field,
            message: format!("{label} must be at most {max} characters"),
        });
    }
    Ok(())
}

pub fn validate_task_title(title: &str) -> Result<()> {
    check_length("title", "Title", title, TASK_TITLE_MAX)
}

pub fn validate_description(description: &str) -> Result<()> {
    check_length("description", "Description", description, TASK_DESCRIPTION_MAX)
}

pub fn validate_column_title(title: &str) -> Result<()> {
    check_length("title", "Column name", title, COLUMN_TITLE_MAX)
}

pub fn validate_user_name(name: &str) -> Result<()> {
    check_length("name", "Name", name, USER_NAME_MAX)
}

/// Destructive actions require retyping the exact title.
pub fn confirm_title(expected: &str, typed: &str) -> Result<()> {
    if expected == typed {
        Ok(())
    } else {
        Err(Error::ConfirmationMismatch(expected.to_string()))
    }
}

/// Unvalidated task form contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<()> {
        validate_task_title(&self.title)?;
        validate_description(&self.description)?;
        Ok(())
    }

    /// Validate and build a task with the given id.
    pub fn into_task(self, id: String) -> Result<Task> {
        self.validate()?;
        Ok(Task {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            assignee_id: self.assignee_id,
            due_date: self.due_date,
            archived_at: None,
        })
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            assignee_id: task.assignee_id.clone(),
            due_date: task.due_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(validate_task_title("").is_err());
        assert!(validate_task_title("a").is_ok());
        assert!(validate_task_title(&"a".repeat(30)).is_ok());
        assert!(validate_task_title(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_lengths_count_chars() {
        // 20 multi-byte chars is still within the column limit
        assert!(validate_column_title(&"é".repeat(20)).is_ok());
        assert!(validate_column_title(&"é".repeat(21)).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = validate_description("").unwrap_err();
        assert_eq!(err.to_string(), "description: Description is required");
        let err = validate_user_name(&"x".repeat(31)).unwrap_err();
        assert_eq!(err.to_string(), "name: Name must be at most 30 characters");
    }

    #[test]
    fn test_confirm_title_is_exact() {
        assert!(confirm_title("Todo", "Todo").is_ok());
        assert!(confirm_title("Todo", "todo").is_err());
        assert!(confirm_title("Todo", "Todo ").is_err());
    }

    #[test]
    fn test_draft_into_task() {
        let draft = TaskDraft {
            title: "X".into(),
            description: "Y".into(),
            priority: Priority::High,
            ..Default::default()
        };
        let task = draft.into_task("t9".into()).unwrap();
        assert_eq!(task.id, "t9");
        assert!(!task.is_archived());

        let bad = TaskDraft::default();
        assert!(bad.into_task("t10".into()).is_err());
    }
}
