//! Everything a presentation layer holds: both stores, the drag controller
//! and dialog state

use crate::{
    BoardStore, Column, ColumnModal, Config, DragController, DragEffect, DragId, Error,
    MembersDrawer, Result, Task, TaskDraft, TaskModal, User, UserModal, UserStore, modal,
    validation,
};
use tracing::info;

pub struct Workspace {
    pub board: BoardStore,
    pub users: UserStore,
    pub drag: DragController,
    pub task_modal: TaskModal,
    pub column_modal: ColumnModal,
    pub user_modal: UserModal,
    pub members_drawer: MembersDrawer,
    share_base_url: String,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Workspace {
    pub fn new(config: &Config) -> Self {
        let users = if config.seed_sample_data {
            UserStore::sample()
        } else {
            UserStore::default()
        };
        Self {
            board: BoardStore::from_config(config),
            users,
            drag: DragController::new(),
            task_modal: TaskModal::default(),
            column_modal: ColumnModal::default(),
            user_modal: UserModal::default(),
            members_drawer: MembersDrawer::default(),
            share_base_url: config.share_base_url.clone(),
        }
    }

    // Form entry points: validate, then issue the store command

    /// Validate a task form and append the task under a fresh id.
    pub fn create_task(&mut self, column_id: &str, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        if self.board.column(column_id).is_none() {
            return Err(Error::ColumnNotFound(column_id.to_string()));
        }
        let task = draft.into_task(self.board.new_id())?;
        self.board.add_task(column_id, task.clone())?;
        Ok(task)
    }

    /// Validate a column title and append an empty column under a fresh id.
    pub fn create_column(&mut self, title: &str) -> Result<Column> {
        validation::validate_column_title(title)?;
        let column = Column::new(self.board.new_id(), title);
        self.board.add_column(column.clone());
        Ok(column)
    }

    pub fn create_user(&mut self, name: &str) -> Result<User> {
        validation::validate_user_name(name)?;
        let user = User::new(self.board.new_id(), name);
        self.users.add_user(user.clone());
        Ok(user)
    }

    /// Delete a task once the user has retyped its title.
    pub fn delete_task_confirmed(&mut self, task_id: &str, column_id: &str, typed: &str) -> Result<()> {
        let title = self
            .board
            .column(column_id)
            .and_then(|c| c.task(task_id))
            .map(|t| t.title.clone())
            .ok_or_else(|| Error::task_not_found(task_id, column_id))?;
        validation::confirm_title(&title, typed)?;
        self.board.delete_task(task_id, column_id)
    }

    /// Delete a column once the user has retyped its title.
    pub fn delete_column_confirmed(&mut self, column_id: &str, typed: &str) -> Result<()> {
        let title = self
            .board
            .column(column_id)
            .map(|c| c.title.clone())
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;
        validation::confirm_title(&title, typed)?;
        self.board.delete_column(column_id)
    }

    /// Remove a user and clear every task assignment pointing at them.
    pub fn remove_user(&mut self, user_id: &str) -> Result<User> {
        let user = self.users.remove_user(user_id)?;
        let cleared = self.board.unassign_user(user_id);
        info!(user_id, cleared, "removed user");
        Ok(user)
    }

    pub fn share_url(&self, column_id: &str, task_id: &str) -> String {
        modal::share_url(&self.share_base_url, column_id, task_id)
    }

    // Drag callbacks

    pub fn drag_start(&mut self, active: &DragId) -> bool {
        self.drag.on_drag_start(&self.board, active)
    }

    pub fn drag_over(&mut self, active: &DragId, over: &DragId) -> DragEffect {
        self.drag.on_drag_over(&mut self.board, active, over)
    }

    pub fn drag_end(&mut self, active: &DragId, over: Option<&DragId>) -> DragEffect {
        self.drag.on_drag_end(&mut self.board, active, over)
    }
}
