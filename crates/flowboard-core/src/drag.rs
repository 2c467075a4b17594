//! Drag-and-drop interpretation
//!
//! Turns a drag gesture (start, any number of overs, end) into board moves.
//! Cross-column task moves happen live during drag-over; same-column task
//! reordering and column reordering happen on drop.

use crate::{BoardStore, Column, Error, Task};
use tracing::{debug, trace};

/// Marker that distinguishes column identifiers from task identifiers
pub const COLUMN_PREFIX: &str = "column-";

/// Identity of a drag source or drop target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragId {
    Column(String),
    Task(String),
}

impl DragId {
    pub fn column(id: impl Into<String>) -> Self {
        DragId::Column(id.into())
    }

    pub fn task(id: impl Into<String>) -> Self {
        DragId::Task(id.into())
    }

    pub fn id(&self) -> &str {
        match self {
            DragId::Column(id) | DragId::Task(id) => id,
        }
    }
}

/// `column-<id>` parses as a column, anything else as a task.
impl std::str::FromStr for DragId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.strip_prefix(COLUMN_PREFIX);
        match id {
            Some("") => Err(Error::InvalidDragId(s.to_string())),
            Some(column_id) => Ok(DragId::Column(column_id.to_string())),
            None if s.is_empty() => Err(Error::InvalidDragId(s.to_string())),
            None => Ok(DragId::Task(s.to_string())),
        }
    }
}

impl std::fmt::Display for DragId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragId::Column(id) => write!(f, "{}{}", COLUMN_PREFIX, id),
            DragId::Task(id) => write!(f, "{}", id),
        }
    }
}

/// Snapshot of the item being dragged, for overlay rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveItem {
    Task(Task),
    Column(Column),
}

/// Board change caused by a drag callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    None,
    TaskMoved {
        task_id: String,
        from: String,
        to: String,
        index: Option<usize>,
    },
    TaskReordered {
        column_id: String,
        from: usize,
        to: usize,
    },
    ColumnMoved {
        from: usize,
        to: usize,
    },
}

/// Idle when `active` is None, dragging otherwise
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<ActiveItem>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveItem> {
        self.active.as_ref()
    }

    pub fn active_task(&self) -> Option<&Task> {
        match self.active {
            Some(ActiveItem::Task(ref task)) => Some(task),
            _ => None,
        }
    }

    pub fn active_column(&self) -> Option<&Column> {
        match self.active {
            Some(ActiveItem::Column(ref column)) => Some(column),
            _ => None,
        }
    }

    /// Load the dragged item. Returns false and stays idle for unknown ids.
    pub fn on_drag_start(&mut self, store: &BoardStore, active: &DragId) -> bool {
        self.active = match active {
            DragId::Column(id) => store.column(id).cloned().map(ActiveItem::Column),
            DragId::Task(id) => store
                .board()
                .find_task(id)
                .map(|(_, task)| ActiveItem::Task(task.clone())),
        };
        debug!(%active, dragging = self.is_dragging(), "drag start");
        self.is_dragging()
    }

    /// Live reparenting of the active task into the hovered column.
    pub fn on_drag_over(
        &mut self,
        store: &mut BoardStore,
        active: &DragId,
        over: &DragId,
    ) -> DragEffect {
        if active == over || self.active_task().is_none() {
            return DragEffect::None;
        }
        let DragId::Task(task_id) = active else {
            return DragEffect::None;
        };
        let Some(source) = store.board().column_of_task(task_id).map(|c| c.id.clone()) else {
            return DragEffect::None;
        };

        let (dest, index) = match over {
            DragId::Column(column_id) => {
                if *column_id == source || store.column(column_id).is_none() {
                    return DragEffect::None;
                }
                (column_id.clone(), None)
            }
            DragId::Task(over_id) => {
                let Some(column) = store.board().column_of_task(over_id) else {
                    return DragEffect::None;
                };
                if column.id == source {
                    // Same-column reordering waits for the drop.
                    return DragEffect::None;
                }
                (column.id.clone(), column.task_index(over_id))
            }
        };

        match store.move_task(task_id, &source, &dest, index) {
            Ok(()) => {
                debug!(task_id = %task_id, from = %source, to = %dest, ?index, "drag over moved task");
                DragEffect::TaskMoved {
                    task_id: task_id.clone(),
                    from: source,
                    to: dest,
                    index,
                }
            }
            Err(e) => {
                trace!(error = %e, "drag over ignored");
                DragEffect::None
            }
        }
    }

    /// Finish the gesture. Always returns to idle.
    pub fn on_drag_end(
        &mut self,
        store: &mut BoardStore,
        active: &DragId,
        over: Option<&DragId>,
    ) -> DragEffect {
        let effect = match over {
            Some(over) => Self::drop_on(store, active, over),
            None => DragEffect::None,
        };
        debug!(%active, over = ?over.map(ToString::to_string), ?effect, "drag end");
        self.active = None;
        effect
    }

    /// Abandon the gesture without touching the board.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    fn drop_on(store: &mut BoardStore, active: &DragId, over: &DragId) -> DragEffect {
        match (active, over) {
            (DragId::Column(a), DragId::Column(o)) if a != o => {
                let (Some(from), Some(to)) = (store.board().column_index(a), store.board().column_index(o))
                else {
                    return DragEffect::None;
                };
                match store.move_column(from, to) {
                    Ok(()) => DragEffect::ColumnMoved { from, to },
                    Err(_) => DragEffect::None,
                }
            }
            (DragId::Task(a), DragId::Task(o)) if a != o => {
                let found = store.columns().iter().find_map(|column| {
                    let from = column.task_index(a)?;
                    let to = column.task_index(o)?;
                    Some((column.id.clone(), from, to))
                });
                let Some((column_id, from, to)) = found else {
                    // Different columns: already handled during drag-over.
                    return DragEffect::None;
                };
                match store.reorder_task(&column_id, from, to) {
                    Ok(()) => DragEffect::TaskReordered { column_id, from, to },
                    Err(_) => DragEffect::None,
                }
            }
            _ => DragEffect::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_ids(store: &BoardStore, column_id: &str) -> Vec<String> {
        store
            .column(column_id)
            .map(|c| c.tasks.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_parse_drag_id() {
        assert_eq!("column-todo".parse::<DragId>().unwrap(), DragId::column("todo"));
        assert_eq!("42".parse::<DragId>().unwrap(), DragId::task("42"));
        assert!("column-".parse::<DragId>().is_err());
        assert!("".parse::<DragId>().is_err());
        assert_eq!(DragId::column("done").to_string(), "column-done");
    }

    #[test]
    fn test_start_unknown_stays_idle() {
        let store = BoardStore::default();
        let mut drag = DragController::new();
        assert!(!drag.on_drag_start(&store, &DragId::task("missing")));
        assert!(!drag.is_dragging());
        assert!(drag.on_drag_start(&store, &DragId::column("todo")));
        assert_eq!(drag.active_column().map(|c| c.id.as_str()), Some("todo"));
        assert!(drag.active_task().is_none());

        // A column id never falls back to the task with the same id
        assert!(!drag.on_drag_start(&store, &DragId::column("1")));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_over_column_moves_task_to_end() {
        let mut store = BoardStore::default();
        let mut drag = DragController::new();
        let active = DragId::task("1");
        drag.on_drag_start(&store, &active);

        let effect = drag.on_drag_over(&mut store, &active, &DragId::column("done"));
        assert!(matches!(effect, DragEffect::TaskMoved { ref to, index: None, .. } if to == "done"));
        assert_eq!(task_ids(&store, "done"), vec!["5", "6", "1"]);
        assert_eq!(task_ids(&store, "todo"), vec!["2"]);

        // Hovering the column it now lives in does nothing.
        let effect = drag.on_drag_over(&mut store, &active, &DragId::column("done"));
        assert_eq!(effect, DragEffect::None);
    }

    #[test]
    fn test_over_task_in_other_column_splices_before_it() {
        let mut store = BoardStore::default();
        let mut drag = DragController::new();
        let active = DragId::task("1");
        drag.on_drag_start(&store, &active);

        drag.on_drag_over(&mut store, &active, &DragId::task("4"));
        assert_eq!(task_ids(&store, "in-progress"), vec!["3", "1", "4"]);
    }

    #[test]
    fn test_over_task_in_same_column_defers_to_drop() {
        let mut store = BoardStore::default();
        let mut drag = DragController::new();
        let active = DragId::task("1");
        drag.on_drag_start(&store, &active);

        let effect = drag.on_drag_over(&mut store, &active, &DragId::task("2"));
        assert_eq!(effect, DragEffect::None);
        assert_eq!(task_ids(&store, "todo"), vec!["1", "2"]);

        let effect = drag.on_drag_end(&mut store, &active, Some(&DragId::task("2")));
        assert_eq!(
            effect,
            DragEffect::TaskReordered {
                column_id: "todo".into(),
                from: 0,
                to: 1
            }
        );
        assert_eq!(task_ids(&store, "todo"), vec!["2", "1"]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_over_without_active_task_is_ignored() {
        let mut store = BoardStore::default();
        let mut drag = DragController::new();
        let effect = drag.on_drag_over(&mut store, &DragId::task("1"), &DragId::column("done"));
        assert_eq!(effect, DragEffect::None);
        assert_eq!(task_ids(&store, "todo"), vec!["1", "2"]);
    }

    #[test]
    fn test_column_drop_reorders_columns() {
        let mut store = BoardStore::default();
        let mut drag = DragController::new();
        let active = DragId::column("todo");
        drag.on_drag_start(&store, &active);

        // Column drags never move tasks on hover.
        assert_eq!(
            drag.on_drag_over(&mut store, &active, &DragId::column("done")),
            DragEffect::None
        );

        let effect = drag.on_drag_end(&mut store, &active, Some(&DragId::column("done")));
        assert_eq!(effect, DragEffect::ColumnMoved { from: 0, to: 2 });
        let order: Vec<_> = store.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["in-progress", "done", "todo"]);
        assert!(drag.active_column().is_none());
    }

    #[test]
    fn test_drop_without_target_clears() {
        let mut store = BoardStore::default();
        let before = store.board().clone();
        let mut drag = DragController::new();
        let active = DragId::column("todo");
        drag.on_drag_start(&store, &active);
        assert_eq!(drag.on_drag_end(&mut store, &active, None), DragEffect::None);
        assert_eq!(store.board(), &before);
        assert!(!drag.is_dragging());

        drag.on_drag_start(&store, &active);
        assert_eq!(
            drag.on_drag_end(&mut store, &active, Some(&DragId::column("todo"))),
            DragEffect::None
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_cross_column_drop_only_clears() {
        let mut store = BoardStore::default();
        let mut drag = DragController::new();
        let active = DragId::task("1");
        drag.on_drag_start(&store, &active);
        drag.on_drag_over(&mut store, &active, &DragId::task("6"));
        let after_over = store.board().clone();

        // The live move already placed the task; dropping on its column changes nothing.
        let effect = drag.on_drag_end(&mut store, &active, Some(&DragId::column("done")));
        assert_eq!(effect, DragEffect::None);
        assert_eq!(store.board(), &after_over);
        assert_eq!(task_ids(&store, "done"), vec!["5", "1", "6"]);
    }
}
