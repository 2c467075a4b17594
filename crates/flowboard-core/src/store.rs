//! In-memory board store
//!
//! Single writer for the board. Each mutation computes the next board with
//! the pure operations in [`crate::board`], swaps it in, and notifies
//! subscribers before returning. A failed lookup leaves the board as it was
//! and is reported through the returned `Result`.

use crate::{
    Board, Column, ColumnPatch, Config, FilterState, IdGenerator, Priority, Result,
    SortDirection, Task, TaskPatch, ViewOption, ViewOptions, seed,
};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Columns or tasks changed
    Board,
    /// Search, priority, assignee or archive visibility changed
    Filters,
    /// Card view options changed
    View,
}

pub type SubscriberId = usize;

type Subscriber = Box<dyn FnMut(&BoardStore, Change)>;

pub struct BoardStore {
    board: Board,
    filters: FilterState,
    view: ViewOptions,
    sort_directions: HashMap<String, SortDirection>,
    ids: IdGenerator,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: SubscriberId,
}

impl std::fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardStore")
            .field("board", &self.board)
            .field("filters", &self.filters)
            .field("view", &self.view)
            .field("sort_directions", &self.sort_directions)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(seed::sample_board(), IdGenerator::default())
    }
}

impl BoardStore {
    pub fn new(board: Board, ids: IdGenerator) -> Self {
        Self {
            board,
            filters: FilterState::default(),
            view: ViewOptions::default(),
            sort_directions: HashMap::new(),
            ids,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// Store seeded and configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let board = if config.seed_sample_data {
            seed::sample_board()
        } else {
            Board::default()
        };
        let mut store = Self::new(board, IdGenerator::new(config.id_prefix.clone()));
        store.view = config.view.options();
        store.filters.show_archived = config.view.show_archived;
        store
    }

    // Reads

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn columns(&self) -> &[Column] {
        &self.board.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.board.column(column_id)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view_options(&self) -> &ViewOptions {
        &self.view
    }

    /// None until the column's sort has been toggled once.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sort_directions.get(column_id).copied()
    }

    /// Visible tasks of a column under the current filters.
    /// Empty for a missing column.
    pub fn filtered_tasks(&self, column_id: &str) -> Vec<&Task> {
        self.board
            .column(column_id)
            .map(|column| self.filters.apply(column))
            .unwrap_or_default()
    }

    /// Fresh id not used by any column or task.
    pub fn new_id(&mut self) -> String {
        let board = &self.board;
        self.ids.next_unique(|candidate| board.contains_id(candidate))
    }

    // Subscriptions

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriberId
    where
        F: FnMut(&BoardStore, Change) + 'static,
    {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, change: Change) {
        let mut subscribers = std::mem::take(&mut self.subscribers);
        for (_, subscriber) in &mut subscribers {
            subscriber(self, change);
        }
        self.subscribers = subscribers;
    }

    /// Swap in the next board, or keep the current one on error.
    fn commit(&mut self, op: &'static str, next: Result<Board>) -> Result<()> {
        match next {
            Ok(board) => {
                self.board = board;
                debug!(op, "board updated");
                self.notify(Change::Board);
                Ok(())
            }
            Err(e) => {
                trace!(op, error = %e, "board unchanged");
                Err(e)
            }
        }
    }

    // Columns

    pub fn add_column(&mut self, column: Column) {
        let next = self.board.add_column(column);
        // add_column cannot fail
        let _ = self.commit("add_column", Ok(next));
    }

    pub fn edit_column(&mut self, column_id: &str, patch: &ColumnPatch) -> Result<()> {
        let next = self.board.edit_column(column_id, patch);
        self.commit("edit_column", next)
    }

    pub fn delete_column(&mut self, column_id: &str) -> Result<()> {
        let next = self.board.delete_column(column_id);
        self.commit("delete_column", next)?;
        self.sort_directions.remove(column_id);
        Ok(())
    }

    pub fn duplicate_column(&mut self, column_id: &str) -> Result<()> {
        let next = self.board.duplicate_column(column_id, &mut self.ids);
        self.commit("duplicate_column", next)
    }

    pub fn archive_column(&mut self, column_id: &str) -> Result<()> {
        let next = self.board.archive_column(column_id, Utc::now());
        self.commit("archive_column", next)
    }

    pub fn unarchive_column(&mut self, column_id: &str) -> Result<()> {
        let next = self.board.unarchive_column(column_id);
        self.commit("unarchive_column", next)
    }

    pub fn move_column(&mut self, from: usize, to: usize) -> Result<()> {
        let next = self.board.move_column(from, to);
        self.commit("move_column", next)
    }

    // Tasks

    pub fn add_task(&mut self, column_id: &str, task: Task) -> Result<()> {
        let next = self.board.add_task(column_id, task);
        self.commit("add_task", next)
    }

    pub fn edit_task(&mut self, task_id: &str, column_id: &str, patch: &TaskPatch) -> Result<()> {
        let next = self.board.edit_task(task_id, column_id, patch);
        self.commit("edit_task", next)
    }

    pub fn delete_task(&mut self, task_id: &str, column_id: &str) -> Result<()> {
        let next = self.board.delete_task(task_id, column_id);
        self.commit("delete_task", next)
    }

    pub fn duplicate_task(&mut self, task_id: &str, column_id: &str) -> Result<()> {
        let next = self.board.duplicate_task(task_id, column_id, &mut self.ids);
        self.commit("duplicate_task", next)
    }

    pub fn archive_task(&mut self, task_id: &str, column_id: &str) -> Result<()> {
        let next = self.board.archive_task(task_id, column_id, Utc::now());
        self.commit("archive_task", next)
    }

    pub fn unarchive_task(&mut self, task_id: &str, column_id: &str) -> Result<()> {
        let next = self.board.unarchive_task(task_id, column_id);
        self.commit("unarchive_task", next)
    }

    pub fn move_task(
        &mut self,
        task_id: &str,
        source: &str,
        dest: &str,
        index: Option<usize>,
    ) -> Result<()> {
        let next = self.board.move_task(task_id, source, dest, index);
        self.commit("move_task", next)
    }

    pub fn reorder_task(&mut self, column_id: &str, from: usize, to: usize) -> Result<()> {
        let next = self.board.reorder_task(column_id, from, to);
        self.commit("reorder_task", next)
    }

    /// Flip the column's sort direction (high-to-low before the first toggle)
    /// and re-sort its tasks. Returns the new direction.
    pub fn toggle_priority_sort(&mut self, column_id: &str) -> Result<SortDirection> {
        let direction = self
            .sort_direction(column_id)
            .unwrap_or_default()
            .toggled();
        let next = self.board.sort_column(column_id, direction);
        self.commit("toggle_priority_sort", next)?;
        self.sort_directions.insert(column_id.to_string(), direction);
        Ok(direction)
    }

    /// Clear `user_id` from every task and from the assignee filter.
    pub fn unassign_user(&mut self, user_id: &str) -> usize {
        let (next, cleared) = self.board.unassign_user(user_id);
        if cleared > 0 {
            let _ = self.commit("unassign_user", Ok(next));
        }
        if self.filters.assignees.remove(user_id) {
            self.notify(Change::Filters);
        }
        cleared
    }

    // Filters and view

    fn update_filters(&mut self, f: impl FnOnce(&mut FilterState)) {
        f(&mut self.filters);
        debug!(filters = ?self.filters, "filters updated");
        self.notify(Change::Filters);
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.update_filters(|f| f.search_query = query);
    }

    pub fn set_priority_filter(&mut self, priorities: impl IntoIterator<Item = Priority>) {
        let priorities: BTreeSet<_> = priorities.into_iter().collect();
        self.update_filters(|f| f.priorities = priorities);
    }

    pub fn toggle_priority_filter(&mut self, priority: Priority) {
        self.update_filters(|f| f.toggle_priority(priority));
    }

    pub fn set_assignee_filter<I, S>(&mut self, user_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let assignees: BTreeSet<String> = user_ids.into_iter().map(Into::into).collect();
        self.update_filters(|f| f.assignees = assignees);
    }

    pub fn toggle_assignee_filter(&mut self, user_id: &str) {
        self.update_filters(|f| f.toggle_assignee(user_id));
    }

    pub fn set_show_unassigned(&mut self, show: bool) {
        self.update_filters(|f| f.show_unassigned = show);
    }

    pub fn toggle_unassigned(&mut self) {
        self.update_filters(|f| f.show_unassigned = !f.show_unassigned);
    }

    pub fn toggle_show_archived(&mut self) {
        self.update_filters(|f| f.show_archived = !f.show_archived);
    }

    pub fn clear_filters(&mut self) {
        self.update_filters(FilterState::clear);
    }

    pub fn set_view_option(&mut self, option: ViewOption, value: bool) {
        self.view.set(option, value);
        debug!(?option, value, "view option updated");
        self.notify(Change::View);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribers_see_new_state() {
        let mut store = BoardStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |store, change| {
            sink.borrow_mut().push((change, store.columns().len()));
        });

        store.add_column(Column::new("review", "Review"));
        store.set_search_query("x");
        assert_eq!(
            *seen.borrow(),
            vec![(Change::Board, 4), (Change::Filters, 4)]
        );
    }

    #[test]
    fn test_failed_mutation_does_not_notify() {
        let mut store = BoardStore::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        let before = store.board().clone();
        assert!(store.delete_task("missing", "todo").is_err());
        assert_eq!(store.board(), &before);
        assert_eq!(*count.borrow(), 0);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_toggle_priority_sort_alternates() {
        let mut store = BoardStore::default();
        assert_eq!(store.sort_direction("todo"), None);
        assert_eq!(
            store.toggle_priority_sort("todo").unwrap(),
            SortDirection::LowToHigh
        );
        assert_eq!(
            store.toggle_priority_sort("todo").unwrap(),
            SortDirection::HighToLow
        );
        let priorities: Vec<_> = store.column("todo").unwrap().tasks.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium]);
        assert!(store.toggle_priority_sort("nope").is_err());
        assert_eq!(store.sort_direction("nope"), None);
    }

    #[test]
    fn test_new_id_is_unused() {
        let mut store = BoardStore::default();
        let id = store.new_id();
        assert!(!store.board().contains_id(&id));
    }

    #[test]
    fn test_unassign_user_clears_filter() {
        let mut store = BoardStore::default();
        store.set_assignee_filter(["1", "2"]);
        let cleared = store.unassign_user("1");
        assert_eq!(cleared, 2);
        assert!(!store.filters().assignees.contains("1"));
        assert!(store.filters().assignees.contains("2"));
    }
}
