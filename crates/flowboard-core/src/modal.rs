//! Dialog state for the presentation layer
//!
//! Pure UI toggles: which dialog is open and what it was opened with. None
//! of this touches the board.

use crate::{Column, Task};

/// A dialog of kind `K` carrying optional context `D`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal<K, D> {
    pub kind: Option<K>,
    pub is_open: bool,
    pub data: Option<D>,
}

impl<K, D> Default for Modal<K, D> {
    fn default() -> Self {
        Self {
            kind: None,
            is_open: false,
            data: None,
        }
    }
}

impl<K: Copy + PartialEq, D> Modal<K, D> {
    pub fn open(&mut self, kind: K, data: Option<D>) {
        self.kind = Some(kind);
        self.is_open = true;
        self.data = data;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Open and showing `kind`
    pub fn is(&self, kind: K) -> bool {
        self.is_open && self.kind == Some(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskModalKind {
    Create,
    Edit,
    Delete,
    Share,
}

/// Context for a task dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContext {
    pub column_id: String,
    /// None when creating
    pub task: Option<Task>,
}

pub type TaskModal = Modal<TaskModalKind, TaskContext>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnModalKind {
    Create,
    Edit,
    Delete,
}

pub type ColumnModal = Modal<ColumnModalKind, Column>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserModalKind {
    Create,
}

pub type UserModal = Modal<UserModalKind, ()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerKind {
    ViewMembers,
}

pub type MembersDrawer = Modal<DrawerKind, ()>;

/// Link to a task: `{base}/{column_id}/{task_id}`
pub fn share_url(base: &str, column_id: &str, task_id: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), column_id, task_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Priority;

    #[test]
    fn test_open_close() {
        let mut modal = TaskModal::default();
        assert!(!modal.is_open);

        let task = Task::new("1", "T", "D", Priority::Low);
        modal.open(
            TaskModalKind::Edit,
            Some(TaskContext {
                column_id: "todo".into(),
                task: Some(task),
            }),
        );
        assert!(modal.is(TaskModalKind::Edit));
        assert!(!modal.is(TaskModalKind::Delete));
        assert_eq!(modal.data.as_ref().map(|c| c.column_id.as_str()), Some("todo"));

        modal.close();
        assert_eq!(modal, TaskModal::default());
    }

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("http://localhost:3000", "todo", "1"),
            "http://localhost:3000/todo/1"
        );
        assert_eq!(
            share_url("https://board.example/", "done", "6"),
            "https://board.example/done/6"
        );
    }
}
