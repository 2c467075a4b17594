//! Serializable board commands
//!
//! One JSON object per command, tagged by `op`. Used to script a session
//! (`flowboard-cli replay`) and applied to a [`Workspace`] exactly as the
//! TUI would issue them.

use crate::{
    Column, ColumnPatch, DragId, Priority, Result, Task, TaskPatch, User, ViewOption, Workspace,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    AddColumn {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        title: String,
    },
    EditColumn {
        column_id: String,
        patch: ColumnPatch,
    },
    DeleteColumn {
        column_id: String,
    },
    DuplicateColumn {
        column_id: String,
    },
    ArchiveColumn {
        column_id: String,
    },
    UnarchiveColumn {
        column_id: String,
    },
    MoveColumn {
        from: usize,
        to: usize,
    },
    AddTask {
        column_id: String,
        task: Task,
    },
    EditTask {
        task_id: String,
        column_id: String,
        patch: TaskPatch,
    },
    DeleteTask {
        task_id: String,
        column_id: String,
    },
    DuplicateTask {
        task_id: String,
        column_id: String,
    },
    ArchiveTask {
        task_id: String,
        column_id: String,
    },
    UnarchiveTask {
        task_id: String,
        column_id: String,
    },
    MoveTask {
        task_id: String,
        source: String,
        dest: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    TogglePrioritySort {
        column_id: String,
    },
    SetSearchQuery {
        query: String,
    },
    SetPriorityFilter {
        priorities: Vec<Priority>,
    },
    SetAssigneeFilter {
        user_ids: Vec<String>,
    },
    SetShowUnassigned {
        show: bool,
    },
    ToggleShowArchived,
    ClearFilters,
    SetViewOption {
        option: ViewOption,
        value: bool,
    },
    AddUser {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
    },
    RemoveUser {
        user_id: String,
    },
    /// Drag ids use the `column-` prefix convention
    DragStart {
        active: String,
    },
    DragOver {
        active: String,
        over: String,
    },
    DragEnd {
        active: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        over: Option<String>,
    },
}

impl Command {
    /// Parse one line of a command script.
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddColumn { .. } => "add_column",
            Command::EditColumn { .. } => "edit_column",
            Command::DeleteColumn { .. } => "delete_column",
            Command::DuplicateColumn { .. } => "duplicate_column",
            Command::ArchiveColumn { .. } => "archive_column",
            Command::UnarchiveColumn { .. } => "unarchive_column",
            Command::MoveColumn { .. } => "move_column",
            Command::AddTask { .. } => "add_task",
            Command::EditTask { .. } => "edit_task",
            Command::DeleteTask { .. } => "delete_task",
            Command::DuplicateTask { .. } => "duplicate_task",
            Command::ArchiveTask { .. } => "archive_task",
            Command::UnarchiveTask { .. } => "unarchive_task",
            Command::MoveTask { .. } => "move_task",
            Command::TogglePrioritySort { .. } => "toggle_priority_sort",
            Command::SetSearchQuery { .. } => "set_search_query",
            Command::SetPriorityFilter { .. } => "set_priority_filter",
            Command::SetAssigneeFilter { .. } => "set_assignee_filter",
            Command::SetShowUnassigned { .. } => "set_show_unassigned",
            Command::ToggleShowArchived => "toggle_show_archived",
            Command::ClearFilters => "clear_filters",
            Command::SetViewOption { .. } => "set_view_option",
            Command::AddUser { .. } => "add_user",
            Command::RemoveUser { .. } => "remove_user",
            Command::DragStart { .. } => "drag_start",
            Command::DragOver { .. } => "drag_over",
            Command::DragEnd { .. } => "drag_end",
        }
    }

    /// Apply to the workspace. Store commands are not form-validated;
    /// a missing id comes back as a not-found error with nothing changed.
    pub fn apply(&self, ws: &mut Workspace) -> Result<()> {
        let store = &mut ws.board;
        match self {
            Command::AddColumn { id, title } => {
                let id = match id {
                    Some(id) => id.clone(),
                    None => store.new_id(),
                };
                store.add_column(Column::new(id, title.clone()));
            }
            Command::EditColumn { column_id, patch } => store.edit_column(column_id, patch)?,
            Command::DeleteColumn { column_id } => store.delete_column(column_id)?,
            Command::DuplicateColumn { column_id } => store.duplicate_column(column_id)?,
            Command::ArchiveColumn { column_id } => store.archive_column(column_id)?,
            Command::UnarchiveColumn { column_id } => store.unarchive_column(column_id)?,
            Command::MoveColumn { from, to } => store.move_column(*from, *to)?,
            Command::AddTask { column_id, task } => store.add_task(column_id, task.clone())?,
            Command::EditTask {
                task_id,
                column_id,
                patch,
            } => store.edit_task(task_id, column_id, patch)?,
            Command::DeleteTask { task_id, column_id } => store.delete_task(task_id, column_id)?,
            Command::DuplicateTask { task_id, column_id } => {
                store.duplicate_task(task_id, column_id)?
            }
            Command::ArchiveTask { task_id, column_id } => store.archive_task(task_id, column_id)?,
            Command::UnarchiveTask { task_id, column_id } => {
                store.unarchive_task(task_id, column_id)?
            }
            Command::MoveTask {
                task_id,
                source,
                dest,
                index,
            } => store.move_task(task_id, source, dest, *index)?,
            Command::TogglePrioritySort { column_id } => {
                store.toggle_priority_sort(column_id)?;
            }
            Command::SetSearchQuery { query } => store.set_search_query(query.clone()),
            Command::SetPriorityFilter { priorities } => {
                store.set_priority_filter(priorities.iter().copied())
            }
            Command::SetAssigneeFilter { user_ids } => store.set_assignee_filter(user_ids),
            Command::SetShowUnassigned { show } => store.set_show_unassigned(*show),
            Command::ToggleShowArchived => store.toggle_show_archived(),
            Command::ClearFilters => store.clear_filters(),
            Command::SetViewOption { option, value } => store.set_view_option(*option, *value),
            Command::AddUser { id, name } => {
                let id = match id {
                    Some(id) => id.clone(),
                    None => store.new_id(),
                };
                ws.users.add_user(User::new(id, name.clone()));
            }
            Command::RemoveUser { user_id } => {
                ws.remove_user(user_id)?;
            }
            Command::DragStart { active } => {
                let active: DragId = active.parse()?;
                ws.drag_start(&active);
            }
            Command::DragOver { active, over } => {
                let active: DragId = active.parse()?;
                let over: DragId = over.parse()?;
                ws.drag_over(&active, &over);
            }
            Command::DragEnd { active, over } => {
                let active: DragId = active.parse()?;
                let over = over.as_deref().map(str::parse::<DragId>).transpose()?;
                ws.drag_end(&active, over.as_ref());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn run(ws: &mut Workspace, script: &str) -> Vec<Result<()>> {
        script
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| Command::from_json(l).and_then(|c| c.apply(ws)))
            .collect()
    }

    #[test]
    fn test_parse_tagged() {
        let cmd = Command::from_json(r#"{"op":"move_column","from":0,"to":2}"#).unwrap();
        assert_eq!(cmd, Command::MoveColumn { from: 0, to: 2 });
        assert_eq!(cmd.name(), "move_column");

        let cmd = Command::from_json(
            r#"{"op":"edit_task","task_id":"3","column_id":"in-progress","patch":{"assignee_id":null}}"#,
        )
        .unwrap();
        let Command::EditTask { patch, .. } = cmd else {
            panic!("expected edit_task");
        };
        assert_eq!(patch.assignee_id, Some(None));

        assert!(matches!(
            Command::from_json(r#"{"op":"explode"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_script_add_and_move() {
        let mut ws = Workspace::default();
        let results = run(
            &mut ws,
            r#"
{"op":"add_task","column_id":"todo","task":{"id":"t9","title":"X","description":"Y","priority":"high"}}
{"op":"move_task","task_id":"t9","source":"todo","dest":"done","index":0}
"#,
        );
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(ws.board.column("done").unwrap().tasks[0].id, "t9");
        assert!(ws.board.column("todo").unwrap().task("t9").is_none());
    }

    #[test]
    fn test_not_found_is_reported_and_harmless() {
        let mut ws = Workspace::default();
        let before = ws.board.board().clone();
        let results = run(
            &mut ws,
            r#"{"op":"delete_task","task_id":"nope","column_id":"todo"}
{"op":"archive_column","column_id":"nope"}
{"op":"remove_user","user_id":"nope"}"#,
        );
        assert!(results.iter().all(|r| r.as_ref().is_err_and(Error::is_not_found)));
        assert_eq!(ws.board.board(), &before);
    }

    #[test]
    fn test_drag_commands() {
        let mut ws = Workspace::default();
        let results = run(
            &mut ws,
            r#"{"op":"drag_start","active":"column-todo"}
{"op":"drag_end","active":"column-todo","over":"column-done"}"#,
        );
        assert!(results.iter().all(Result::is_ok));
        let order: Vec<_> = ws.board.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, ["in-progress", "done", "todo"]);
        assert!(!ws.drag.is_dragging());

        let err = Command::DragStart { active: "column-".into() }
            .apply(&mut ws)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDragId(_)));
    }

    #[test]
    fn test_filter_commands() {
        let mut ws = Workspace::default();
        run(
            &mut ws,
            r#"{"op":"set_priority_filter","priorities":["high"]}
{"op":"set_view_option","option":"show_description","value":false}"#,
        );
        assert!(ws.board.filters().priorities.contains(&Priority::High));
        assert!(!ws.board.view_options().show_description);

        Command::ClearFilters.apply(&mut ws).unwrap();
        assert!(!ws.board.filters().is_active());
    }
}
