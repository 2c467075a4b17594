//! Board state and its pure operations
//!
//! Every operation takes the current board by reference and returns the next
//! board, leaving the input untouched. Operations on a missing column, task
//! or index return an error and produce no board; callers keep the old one.

use crate::{Column, ColumnPatch, Error, IdGenerator, Result, SortDirection, Task, TaskPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const COPY_SUFFIX: &str = " (Copy)";

/// Ordered sequence of columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Find a task anywhere on the board, with its owning column.
    pub fn find_task(&self, task_id: &str) -> Option<(&Column, &Task)> {
        self.columns
            .iter()
            .find_map(|c| c.task(task_id).map(|t| (c, t)))
    }

    pub fn column_of_task(&self, task_id: &str) -> Option<&Column> {
        self.find_task(task_id).map(|(c, _)| c)
    }

    /// True if any column or task uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.id == id || c.contains_task(id))
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Clone the board and run `f` on the named column of the clone.
    fn with_column<F>(&self, column_id: &str, f: F) -> Result<Board>
    where
        F: FnOnce(&mut Column) -> Result<()>,
    {
        let mut next = self.clone();
        let column = next
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;
        f(column)?;
        Ok(next)
    }

    /// Clone the board and run `f` on the named task of the named column.
    fn with_task<F>(&self, task_id: &str, column_id: &str, f: F) -> Result<Board>
    where
        F: FnOnce(&mut Task),
    {
        self.with_column(column_id, |column| {
            let task = column
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| Error::task_not_found(task_id, column_id))?;
            f(task);
            Ok(())
        })
    }

    // Columns

    /// Append a column. The caller supplies a unique id.
    pub fn add_column(&self, column: Column) -> Board {
        let mut next = self.clone();
        next.columns.push(column);
        next
    }

    pub fn edit_column(&self, column_id: &str, patch: &ColumnPatch) -> Result<Board> {
        self.with_column(column_id, |column| {
            column.apply(patch);
            Ok(())
        })
    }

    /// Remove a column and all of its tasks.
    pub fn delete_column(&self, column_id: &str) -> Result<Board> {
        let index = self
            .column_index(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;
        let mut next = self.clone();
        next.columns.remove(index);
        Ok(next)
    }

    /// Deep-copy a column right after the original, with fresh ids throughout.
    pub fn duplicate_column(&self, column_id: &str, ids: &mut IdGenerator) -> Result<Board> {
        let index = self
            .column_index(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;

        let mut copy = self.columns[index].clone();
        copy.id = ids.next_unique(|candidate| self.contains_id(candidate));
        copy.title.push_str(COPY_SUFFIX);
        for task in &mut copy.tasks {
            task.id = ids.next_unique(|candidate| self.contains_id(candidate));
        }

        let mut next = self.clone();
        next.columns.insert(index + 1, copy);
        Ok(next)
    }

    pub fn archive_column(&self, column_id: &str, at: DateTime<Utc>) -> Result<Board> {
        self.with_column(column_id, |column| {
            column.archive(at);
            Ok(())
        })
    }

    pub fn unarchive_column(&self, column_id: &str) -> Result<Board> {
        self.with_column(column_id, |column| {
            column.unarchive();
            Ok(())
        })
    }

    /// Array-move: take the column at `from` and re-insert it at `to`.
    pub fn move_column(&self, from: usize, to: usize) -> Result<Board> {
        let mut next = self.clone();
        array_move(&mut next.columns, from, to)?;
        Ok(next)
    }

    // Tasks

    pub fn add_task(&self, column_id: &str, task: Task) -> Result<Board> {
        self.with_column(column_id, |column| {
            column.tasks.push(task);
            Ok(())
        })
    }

    /// Merge `patch` into the task. Only the named column is searched.
    pub fn edit_task(&self, task_id: &str, column_id: &str, patch: &TaskPatch) -> Result<Board> {
        self.with_task(task_id, column_id, |task| task.apply(patch))
    }

    pub fn delete_task(&self, task_id: &str, column_id: &str) -> Result<Board> {
        self.with_column(column_id, |column| {
            let index = column
                .task_index(task_id)
                .ok_or_else(|| Error::task_not_found(task_id, column_id))?;
            column.tasks.remove(index);
            Ok(())
        })
    }

    /// Copy a task to the end of its column under a fresh id.
    pub fn duplicate_task(
        &self,
        task_id: &str,
        column_id: &str,
        ids: &mut IdGenerator,
    ) -> Result<Board> {
        let new_id = ids.next_unique(|candidate| self.contains_id(candidate));
        self.with_column(column_id, |column| {
            let mut copy = column
                .task(task_id)
                .cloned()
                .ok_or_else(|| Error::task_not_found(task_id, column_id))?;
            copy.id = new_id;
            copy.title.push_str(COPY_SUFFIX);
            column.tasks.push(copy);
            Ok(())
        })
    }

    pub fn archive_task(&self, task_id: &str, column_id: &str, at: DateTime<Utc>) -> Result<Board> {
        self.with_task(task_id, column_id, |task| task.archive(at))
    }

    pub fn unarchive_task(&self, task_id: &str, column_id: &str) -> Result<Board> {
        self.with_task(task_id, column_id, Task::unarchive)
    }

    /// Remove a task from `source` and insert it into `dest` at `index`
    /// (clamped to the destination length) or at the end.
    ///
    /// `source == dest` repositions the task within its column.
    pub fn move_task(
        &self,
        task_id: &str,
        source: &str,
        dest: &str,
        index: Option<usize>,
    ) -> Result<Board> {
        let src_idx = self
            .column_index(source)
            .ok_or_else(|| Error::ColumnNotFound(source.to_string()))?;
        let dst_idx = self
            .column_index(dest)
            .ok_or_else(|| Error::ColumnNotFound(dest.to_string()))?;
        let task_idx = self.columns[src_idx]
            .task_index(task_id)
            .ok_or_else(|| Error::task_not_found(task_id, source))?;

        let mut next = self.clone();
        let task = next.columns[src_idx].tasks.remove(task_idx);
        let tasks = &mut next.columns[dst_idx].tasks;
        let at = index.map_or(tasks.len(), |i| i.min(tasks.len()));
        tasks.insert(at, task);
        Ok(next)
    }

    /// Array-move within one column's task list.
    pub fn reorder_task(&self, column_id: &str, from: usize, to: usize) -> Result<Board> {
        self.with_column(column_id, |column| array_move(&mut column.tasks, from, to))
    }

    /// Stable sort of one column's tasks by priority rank.
    pub fn sort_column(&self, column_id: &str, direction: SortDirection) -> Result<Board> {
        self.with_column(column_id, |column| {
            column.tasks.sort_by_key(|t| t.priority.rank(direction));
            Ok(())
        })
    }

    /// Clear every reference to `user_id`. Returns the board and how many
    /// tasks changed.
    pub fn unassign_user(&self, user_id: &str) -> (Board, usize) {
        let mut next = self.clone();
        let mut cleared = 0;
        for task in next.columns.iter_mut().flat_map(|c| c.tasks.iter_mut()) {
            if task.assignee_id.as_deref() == Some(user_id) {
                task.assignee_id = None;
                cleared += 1;
            }
        }
        (next, cleared)
    }
}

/// Remove the item at `from` and re-insert it at `to`; items in between
/// shift by one. Both indices must address existing items.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = items.len();
    if from >= len {
        return Err(Error::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(Error::IndexOutOfRange { index: to, len });
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}
