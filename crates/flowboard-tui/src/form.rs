//! Form state for the dialogs

use chrono::NaiveDate;
use flowboard_core::{Error, Priority, Task, TaskDraft, TaskPatch, User};

/// Due dates are typed in ISO form regardless of the display format
const DUE_DATE_INPUT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskField {
    #[default]
    Title,
    Description,
    Priority,
    Assignee,
    DueDate,
}

impl TaskField {
    pub fn next(self) -> Self {
        match self {
            TaskField::Title => TaskField::Description,
            TaskField::Description => TaskField::Priority,
            TaskField::Priority => TaskField::Assignee,
            TaskField::Assignee => TaskField::DueDate,
            TaskField::DueDate => TaskField::Title,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            TaskField::Title | TaskField::Description | TaskField::DueDate
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assignee_id: Option<String>,
    pub due_date: String,
    pub field: TaskField,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            assignee_id: task.assignee_id.clone(),
            due_date: task
                .due_date
                .map(|d| d.format(DUE_DATE_INPUT).to_string())
                .unwrap_or_default(),
            field: TaskField::Title,
            error: None,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            TaskField::Title => Some(&mut self.title),
            TaskField::Description => Some(&mut self.description),
            TaskField::DueDate => Some(&mut self.due_date),
            _ => None,
        }
    }

    pub fn push(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn pop(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Step the selected choice field; `forward` is Down.
    pub fn cycle(&mut self, forward: bool, users: &[User]) {
        match self.field {
            TaskField::Priority => {
                let all = Priority::ALL;
                let idx = all.iter().position(|p| *p == self.priority).unwrap_or(0);
                let next = if forward {
                    (idx + 1) % all.len()
                } else {
                    (idx + all.len() - 1) % all.len()
                };
                self.priority = all[next];
            }
            TaskField::Assignee => {
                // Slot 0 is "unassigned", then one slot per user
                let slots = users.len() + 1;
                let current = self
                    .assignee_id
                    .as_deref()
                    .and_then(|id| users.iter().position(|u| u.id == id))
                    .map_or(0, |i| i + 1);
                let next = if forward {
                    (current + 1) % slots
                } else {
                    (current + slots - 1) % slots
                };
                self.assignee_id = next.checked_sub(1).map(|i| users[i].id.clone());
            }
            _ => {}
        }
    }

    /// Validated form contents.
    pub fn to_draft(&self) -> flowboard_core::Result<TaskDraft> {
        let due_date = match self.due_date.trim() {
            "" => None,
            text => Some(NaiveDate::parse_from_str(text, DUE_DATE_INPUT).map_err(|_| {
                Error::Validation {
                    field: "due_date",
                    message: "Due date must be YYYY-MM-DD".to_string(),
                }
            })?),
        };
        let draft = TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            assignee_id: self.assignee_id.clone(),
            due_date,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Replace every editable field of a task with the draft's values.
pub fn patch_from_draft(draft: TaskDraft) -> TaskPatch {
    TaskPatch {
        title: Some(draft.title),
        description: Some(draft.description),
        priority: Some(draft.priority),
        assignee_id: Some(draft.assignee_id),
        due_date: Some(draft.due_date),
    }
}

/// Single-line input used for column titles, user names and delete
/// confirmations
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub error: Option<String>,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            error: None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<User> {
        vec![User::new("1", "John Doe"), User::new("2", "Jane Smith")]
    }

    #[test]
    fn test_assignee_cycles_through_unassigned() {
        let mut form = TaskForm {
            field: TaskField::Assignee,
            ..Default::default()
        };
        let users = users();
        form.cycle(true, &users);
        assert_eq!(form.assignee_id.as_deref(), Some("1"));
        form.cycle(true, &users);
        assert_eq!(form.assignee_id.as_deref(), Some("2"));
        form.cycle(true, &users);
        assert_eq!(form.assignee_id, None);
        form.cycle(false, &users);
        assert_eq!(form.assignee_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_priority_cycle_wraps() {
        let mut form = TaskForm {
            field: TaskField::Priority,
            ..Default::default()
        };
        form.cycle(false, &[]);
        assert_eq!(form.priority, Priority::High);
        form.cycle(false, &[]);
        assert_eq!(form.priority, Priority::Low);
    }

    #[test]
    fn test_typing_only_touches_text_fields() {
        let mut form = TaskForm::default();
        form.push('a');
        form.field = TaskField::Priority;
        form.push('b');
        form.field = form.field.next().next();
        form.push('2');
        assert_eq!(form.title, "a");
        assert_eq!(form.due_date, "2");
    }

    #[test]
    fn test_to_draft_reports_first_problem() {
        let mut form = TaskForm::default();
        let err = form.to_draft().unwrap_err();
        assert_eq!(err.to_string(), "title: Title is required");

        form.title = "Ship".into();
        form.description = "Release 1.0".into();
        form.due_date = "next week".into();
        assert!(matches!(
            form.to_draft(),
            Err(Error::Validation { field: "due_date", .. })
        ));

        form.due_date = "2025-05-01".into();
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 5, 1));
    }

    #[test]
    fn test_from_task_round_trips_into_patch() {
        let task = Task::new("7", "Review", "PR 12", Priority::Low)
            .with_assignee("2")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
        let form = TaskForm::from_task(&task);
        assert_eq!(form.due_date, "2025-04-30");

        let mut edited = task.clone();
        edited.apply(&patch_from_draft(form.to_draft().unwrap()));
        assert_eq!(edited, task);
    }
}
