//! End-to-end scenarios against the sample board

use flowboard_core::{
    BoardStore, Change, Column, DragId, Error, Priority, SortDirection, Task, TaskPatch, Workspace,
};
use std::cell::RefCell;
use std::rc::Rc;

fn ids(store: &BoardStore, column_id: &str) -> Vec<String> {
    store
        .column(column_id)
        .map(|c| c.tasks.iter().map(|t| t.id.clone()).collect())
        .unwrap_or_default()
}

fn column_ids(store: &BoardStore) -> Vec<String> {
    store.columns().iter().map(|c| c.id.clone()).collect()
}

#[test]
fn add_then_move_to_top_of_done() {
    let mut store = BoardStore::default();
    store
        .add_task("todo", Task::new("t9", "X", "Y", Priority::High))
        .unwrap();
    store.move_task("t9", "todo", "done", Some(0)).unwrap();

    assert_eq!(ids(&store, "todo"), ["1", "2"]);
    assert_eq!(ids(&store, "done"), ["t9", "5", "6"]);
}

#[test]
fn add_then_move_appends_to_done() {
    let mut store = BoardStore::default();
    store
        .add_task("todo", Task::new("t9", "X", "Y", Priority::High))
        .unwrap();

    let visible: Vec<&str> = store
        .filtered_tasks("todo")
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(visible, ["1", "2", "t9"]);

    store.move_task("t9", "todo", "done", None).unwrap();

    assert_eq!(ids(&store, "todo"), ["1", "2"]);
    assert_eq!(ids(&store, "done"), ["5", "6", "t9"]);
    assert!(store.filtered_tasks("todo").iter().all(|t| t.id != "t9"));
}

#[test]
fn move_column_first_to_last() {
    let mut store = BoardStore::new(
        flowboard_core::Board::new(vec![
            Column::new("A", "A"),
            Column::new("B", "B"),
            Column::new("C", "C"),
        ]),
        Default::default(),
    );
    store.move_column(0, 2).unwrap();
    assert_eq!(column_ids(&store), ["B", "C", "A"]);
}

#[test]
fn archived_column_is_hidden_until_toggled() {
    let mut store = BoardStore::default();
    store.archive_column("in-progress").unwrap();

    let column = store.column("in-progress").unwrap();
    assert!(column.is_archived());
    assert!(column.tasks.iter().all(Task::is_archived));
    assert!(store.filtered_tasks("in-progress").is_empty());

    store.toggle_show_archived();
    assert_eq!(store.filtered_tasks("in-progress").len(), 2);

    store.unarchive_column("in-progress").unwrap();
    let column = store.column("in-progress").unwrap();
    assert!(!column.is_archived());
    assert!(column.tasks.iter().all(|t| t.archived_at.is_none()));
}

#[test]
fn inactive_filters_show_everything() {
    let store = BoardStore::default();
    assert!(!store.filters().is_active());
    for column in store.columns() {
        assert_eq!(store.filtered_tasks(&column.id).len(), column.tasks.len());
    }
}

#[test]
fn search_and_priority_filters_combine() {
    let mut store = BoardStore::default();
    store.set_search_query("DESIGN");
    assert_eq!(
        store.filtered_tasks("todo").iter().map(|t| &t.id).collect::<Vec<_>>(),
        ["2"]
    );
    assert_eq!(store.filtered_tasks("done").len(), 1);

    store.set_priority_filter([Priority::Medium]);
    assert!(store.filtered_tasks("todo").is_empty());

    store.clear_filters();
    store.set_show_unassigned(true);
    assert_eq!(store.filtered_tasks("todo").len(), 2);
    assert!(store.filtered_tasks("done").is_empty());
}

#[test]
fn duplicate_task_appends_copy_with_fresh_id() {
    let mut store = BoardStore::default();
    store.duplicate_task("2", "todo").unwrap();

    let tasks = &store.column("todo").unwrap().tasks;
    assert_eq!(tasks.len(), 3);
    let copy = &tasks[2];
    assert_ne!(copy.id, "2");
    assert_eq!(copy.title, "Design new landing page (Copy)");
    assert_eq!(copy.description, tasks[1].description);
    assert_eq!(copy.priority, Priority::High);
    assert!(store.board().find_task(&copy.id).is_some());
}

#[test]
fn priority_sort_toggles_from_high_to_low_default() {
    let mut store = BoardStore::default();
    assert_eq!(
        store.toggle_priority_sort("todo").unwrap(),
        SortDirection::LowToHigh
    );
    assert_eq!(ids(&store, "todo"), ["1", "2"]);
    assert_eq!(
        store.toggle_priority_sort("todo").unwrap(),
        SortDirection::HighToLow
    );
    assert_eq!(ids(&store, "todo"), ["2", "1"]);
}

#[test]
fn missing_ids_leave_board_unchanged() {
    let mut store = BoardStore::default();
    let before = store.board().clone();

    let err = store
        .edit_task("1", "done", &TaskPatch::default())
        .unwrap_err();
    assert!(matches!(err, Error::TaskNotFound { .. }));
    assert!(store.delete_column("nope").unwrap_err().is_not_found());
    assert!(store.move_task("1", "todo", "nope", None).is_err());
    assert!(store.move_column(0, 3).is_err());
    assert!(store.reorder_task("todo", 0, 2).is_err());

    assert_eq!(store.board(), &before);
}

#[test]
fn subscribers_see_every_change() {
    let mut store = BoardStore::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |store, change| {
        sink.borrow_mut().push((change, store.board().task_count()));
    });

    store.delete_task("1", "todo").unwrap();
    store.set_search_query("x");
    let _ = store.delete_task("1", "todo");

    assert_eq!(
        *seen.borrow(),
        [(Change::Board, 5), (Change::Filters, 5)]
    );
}

#[test]
fn drag_task_across_columns_then_drop() {
    let mut ws = Workspace::default();
    let active = DragId::task("1");

    assert!(ws.drag_start(&active));
    ws.drag_over(&active, &DragId::task("5"));
    assert_eq!(ids(&ws.board, "done"), ["1", "5", "6"]);

    ws.drag_over(&active, &DragId::column("in-progress"));
    assert_eq!(ids(&ws.board, "in-progress"), ["3", "4", "1"]);
    assert!(ids(&ws.board, "done").iter().all(|id| id != "1"));

    ws.drag_end(&active, Some(&DragId::task("3")));
    assert_eq!(ids(&ws.board, "in-progress"), ["1", "3", "4"]);
    assert!(!ws.drag.is_dragging());
}

#[test]
fn removing_user_orphans_nothing() {
    let mut ws = Workspace::default();
    ws.remove_user("1").unwrap();
    assert!(ws.users.get("1").is_none());
    assert!(
        ws.board
            .columns()
            .iter()
            .flat_map(|c| &c.tasks)
            .filter_map(|t| t.assignee_id.as_deref())
            .all(|id| ws.users.get(id).is_some())
    );
}
