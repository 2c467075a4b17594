//! Application state and input handling

use crate::form::{TaskField, TaskForm, TextInput, patch_from_draft};
use crate::ui::HitMap;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use flowboard_core::{
    Change, Column, ColumnModalKind, ColumnPatch, Config, DragEffect, DragId, DrawerKind,
    Priority, Task, TaskContext, TaskModalKind, UserModalKind, ViewOption, Workspace,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Search,
    Help,
    Filter,
    Settings,
    /// One of the task, column or user dialogs is open
    Dialog,
    Members,
    /// Keyboard drag in progress
    Grab,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
    Escape,
    Backspace,
    Char(char),
    Noop,
}

/// Arrows map to movement; letters stay letters so text fields can use them.
pub fn parse_key_action(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Up => KeyAction::Up,
        KeyCode::Down => KeyAction::Down,
        KeyCode::Left => KeyAction::Left,
        KeyCode::Right => KeyAction::Right,
        KeyCode::Enter => KeyAction::Enter,
        KeyCode::Tab => KeyAction::Tab,
        KeyCode::Esc => KeyAction::Escape,
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Char(c) => KeyAction::Char(c),
        _ => KeyAction::Noop,
    }
}

/// Selected column and task, as indexes into the visible lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub column: usize,
    pub task: usize,
}

/// Keyboard drag: the grabbed item and the pending drop target
#[derive(Debug, Clone)]
pub struct Grab {
    pub active: DragId,
    pub over: Option<DragId>,
}

#[derive(Debug, Clone)]
struct MouseDrag {
    active: DragId,
    over: Option<DragId>,
}

pub struct App {
    pub ws: Workspace,
    pub config: Config,
    pub mode: AppMode,
    pub cursor: Cursor,
    pub search_input: String,
    pub task_form: TaskForm,
    pub text_input: TextInput,
    pub members_index: usize,
    pub grab: Option<Grab>,
    pub hits: HitMap,
    pub status_message: Option<String>,
    status_message_time: Option<Instant>,
    mouse_drag: Option<MouseDrag>,
    changes: Rc<RefCell<Vec<Change>>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut ws = Workspace::new(&config);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        ws.board.subscribe(move |_, change| sink.borrow_mut().push(change));

        Self {
            ws,
            config,
            mode: AppMode::Normal,
            cursor: Cursor::default(),
            search_input: String::new(),
            task_form: TaskForm::default(),
            text_input: TextInput::default(),
            members_index: 0,
            grab: None,
            hits: HitMap::default(),
            status_message: None,
            status_message_time: None,
            mouse_drag: None,
            changes,
        }
    }

    // Selection

    pub fn visible_columns(&self) -> Vec<&Column> {
        let filters = self.ws.board.filters();
        self.ws
            .board
            .columns()
            .iter()
            .filter(|c| filters.column_visible(c))
            .collect()
    }

    pub fn current_column(&self) -> Option<&Column> {
        self.visible_columns().get(self.cursor.column).copied()
    }

    pub fn current_task(&self) -> Option<&Task> {
        let column = self.current_column()?;
        self.ws
            .board
            .filtered_tasks(&column.id)
            .get(self.cursor.task)
            .copied()
    }

    fn current_ids(&self) -> (Option<String>, Option<String>) {
        (
            self.current_column().map(|c| c.id.clone()),
            self.current_task().map(|t| t.id.clone()),
        )
    }

    fn clamp_cursor(&mut self) {
        let columns = self.visible_columns().len();
        self.cursor.column = self.cursor.column.min(columns.saturating_sub(1));
        let tasks = self
            .current_column()
            .map_or(0, |c| self.ws.board.filtered_tasks(&c.id).len());
        self.cursor.task = self.cursor.task.min(tasks.saturating_sub(1));
    }

    fn move_cursor(&mut self, columns: isize, tasks: isize) {
        self.cursor.column = self.cursor.column.saturating_add_signed(columns);
        self.cursor.task = self.cursor.task.saturating_add_signed(tasks);
        self.clamp_cursor();
    }

    /// Point the cursor at a task wherever it is now.
    fn focus_task(&mut self, task_id: &str) {
        let found = self.visible_columns().iter().enumerate().find_map(|(ci, c)| {
            self.ws
                .board
                .filtered_tasks(&c.id)
                .iter()
                .position(|t| t.id == task_id)
                .map(|ti| (ci, ti))
        });
        if let Some((column, task)) = found {
            self.cursor = Cursor { column, task };
        }
    }

    fn focus_column(&mut self, column_id: &str) {
        if let Some(column) = self.visible_columns().iter().position(|c| c.id == column_id) {
            self.cursor = Cursor { column, task: 0 };
        }
    }

    /// Drain store notifications and keep the cursor on something visible.
    fn sync(&mut self) {
        let changed: Vec<Change> = self.changes.borrow_mut().drain(..).collect();
        if changed
            .iter()
            .any(|c| matches!(c, Change::Board | Change::Filters))
        {
            self.clamp_cursor();
        }
    }

    // Status line

    pub fn show_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn on_tick(&mut self) {
        if let Some(time) = self.status_message_time
            && time.elapsed() > STATUS_TTL
        {
            self.status_message = None;
            self.status_message_time = None;
        }
    }

    /// Report a store outcome. Missing ids are silent no-ops.
    fn report(&mut self, result: flowboard_core::Result<()>, ok: impl Into<String>) {
        match result {
            Ok(()) => self.show_status(ok),
            Err(e) if e.is_not_found() => debug!(error = %e, "ignored"),
            Err(e) => {
                warn!(error = %e, "operation failed");
                self.show_status(e.to_string());
            }
        }
    }

    // Keyboard

    pub fn handle_key_action(&mut self, action: KeyAction) -> Result<bool> {
        if action == KeyAction::Quit {
            return Ok(true);
        }
        let quit = match self.mode {
            AppMode::Normal => self.handle_normal_mode(action)?,
            AppMode::Search => self.handle_search_mode(action),
            AppMode::Help => self.handle_help_mode(action),
            AppMode::Filter => self.handle_filter_mode(action),
            AppMode::Settings => self.handle_settings_mode(action),
            AppMode::Dialog => self.handle_dialog_mode(action),
            AppMode::Members => self.handle_members_mode(action),
            AppMode::Grab => self.handle_grab_mode(action),
        };
        self.sync();
        Ok(quit)
    }

    fn handle_normal_mode(&mut self, action: KeyAction) -> Result<bool> {
        let (column_id, task_id) = self.current_ids();
        match action {
            KeyAction::Char('q') => return Ok(true),
            KeyAction::Left | KeyAction::Char('h') => self.move_cursor(-1, 0),
            KeyAction::Right | KeyAction::Char('l') => self.move_cursor(1, 0),
            KeyAction::Up | KeyAction::Char('k') => self.move_cursor(0, -1),
            KeyAction::Down | KeyAction::Char('j') => self.move_cursor(0, 1),
            KeyAction::Escape => {
                self.status_message = None;
            }
            KeyAction::Char('/') => {
                self.search_input = self.ws.board.filters().search_query.clone();
                self.mode = AppMode::Search;
            }
            KeyAction::Char('f') => self.mode = AppMode::Filter,
            KeyAction::Char('o') => self.mode = AppMode::Settings,
            KeyAction::Char('?') => self.mode = AppMode::Help,
            KeyAction::Char('u') => {
                self.ws.members_drawer.open(DrawerKind::ViewMembers, None);
                self.members_index = 0;
                self.mode = AppMode::Members;
            }
            KeyAction::Char('s') => {
                if let Some(column_id) = column_id {
                    match self.ws.board.toggle_priority_sort(&column_id) {
                        Ok(direction) => self.show_status(format!("Sorted {}", direction)),
                        Err(e) => debug!(error = %e, "sort ignored"),
                    }
                }
            }
            KeyAction::Char('A') => {
                self.text_input.clear();
                self.ws.column_modal.open(ColumnModalKind::Create, None);
                self.mode = AppMode::Dialog;
            }
            KeyAction::Char('a') => {
                if let Some(column_id) = column_id {
                    self.task_form.reset();
                    self.ws.task_modal.open(
                        TaskModalKind::Create,
                        Some(TaskContext {
                            column_id,
                            task: None,
                        }),
                    );
                    self.mode = AppMode::Dialog;
                }
            }
            KeyAction::Char(c @ ('e' | 'd' | 'S')) => {
                if let (Some(column_id), Some(task)) = (column_id, self.current_task().cloned()) {
                    let kind = match c {
                        'e' => TaskModalKind::Edit,
                        'd' => TaskModalKind::Delete,
                        _ => TaskModalKind::Share,
                    };
                    self.task_form = TaskForm::from_task(&task);
                    self.text_input.clear();
                    self.ws.task_modal.open(
                        kind,
                        Some(TaskContext {
                            column_id,
                            task: Some(task),
                        }),
                    );
                    self.mode = AppMode::Dialog;
                }
            }
            KeyAction::Char(c @ ('E' | 'D')) => {
                if let Some(column) = self.current_column().cloned() {
                    let kind = if c == 'E' {
                        self.text_input = TextInput::with_value(column.title.clone());
                        ColumnModalKind::Edit
                    } else {
                        self.text_input.clear();
                        ColumnModalKind::Delete
                    };
                    self.ws.column_modal.open(kind, Some(column));
                    self.mode = AppMode::Dialog;
                }
            }
            KeyAction::Char('y') => {
                if let (Some(column_id), Some(task_id)) = (column_id, task_id) {
                    let result = self.ws.board.duplicate_task(&task_id, &column_id);
                    self.report(result, "Task duplicated");
                }
            }
            KeyAction::Char('Y') => {
                if let Some(column_id) = column_id {
                    let result = self.ws.board.duplicate_column(&column_id);
                    self.report(result, "Column duplicated");
                }
            }
            KeyAction::Char('x') => {
                if let (Some(column_id), Some(task)) = (column_id, self.current_task().cloned()) {
                    let (result, msg) = if task.is_archived() {
                        (self.ws.board.unarchive_task(&task.id, &column_id), "Task restored")
                    } else {
                        (self.ws.board.archive_task(&task.id, &column_id), "Task archived")
                    };
                    self.report(result, msg);
                }
            }
            KeyAction::Char('X') => {
                if let Some(column) = self.current_column().cloned() {
                    let (result, msg) = if column.is_archived() {
                        (self.ws.board.unarchive_column(&column.id), "Column restored")
                    } else {
                        (self.ws.board.archive_column(&column.id), "Column archived")
                    };
                    self.report(result, msg);
                }
            }
            KeyAction::Char('m') => {
                if let Some(task_id) = task_id {
                    self.start_grab(DragId::Task(task_id));
                }
            }
            KeyAction::Char('M') => {
                if let Some(column_id) = column_id {
                    self.start_grab(DragId::Column(column_id));
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_search_mode(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Escape => {
                self.search_input.clear();
                self.ws.board.set_search_query("");
                self.mode = AppMode::Normal;
            }
            KeyAction::Enter => self.mode = AppMode::Normal,
            KeyAction::Backspace => {
                self.search_input.pop();
                self.ws.board.set_search_query(self.search_input.clone());
            }
            KeyAction::Char(c) => {
                self.search_input.push(c);
                self.ws.board.set_search_query(self.search_input.clone());
            }
            _ => {}
        }
        false
    }

    fn handle_help_mode(&mut self, action: KeyAction) -> bool {
        if matches!(action, KeyAction::Escape | KeyAction::Char('q' | '?')) {
            self.mode = AppMode::Normal;
        }
        false
    }

    fn handle_filter_mode(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Escape | KeyAction::Enter | KeyAction::Char('f') => {
                self.mode = AppMode::Normal
            }
            KeyAction::Char('H') => self.ws.board.toggle_priority_filter(Priority::High),
            KeyAction::Char('M') => self.ws.board.toggle_priority_filter(Priority::Medium),
            KeyAction::Char('L') => self.ws.board.toggle_priority_filter(Priority::Low),
            KeyAction::Char('0') => self.ws.board.toggle_unassigned(),
            KeyAction::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(user) = self.ws.users.users().get(index).cloned() {
                    self.ws.board.toggle_assignee_filter(&user.id);
                }
            }
            KeyAction::Char('c') => {
                self.ws.board.clear_filters();
                self.show_status("Filters cleared");
            }
            _ => {}
        }
        false
    }

    fn handle_settings_mode(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Escape | KeyAction::Enter | KeyAction::Char('o') => {
                self.mode = AppMode::Normal
            }
            KeyAction::Char('a') => self.ws.board.toggle_show_archived(),
            KeyAction::Char(c @ '1'..='4') => {
                let option = ViewOption::ALL[c as usize - '1' as usize];
                let value = !self.ws.board.view_options().get(option);
                self.ws.board.set_view_option(option, value);
            }
            _ => {}
        }
        false
    }

    // Dialogs

    fn close_dialog(&mut self) {
        self.ws.task_modal.close();
        self.ws.column_modal.close();
        self.ws.user_modal.close();
        self.mode = if self.ws.members_drawer.is_open {
            AppMode::Members
        } else {
            AppMode::Normal
        };
    }

    fn handle_dialog_mode(&mut self, action: KeyAction) -> bool {
        if action == KeyAction::Escape {
            self.close_dialog();
            return false;
        }
        if let Some(kind) = self.ws.task_modal.kind.filter(|_| self.ws.task_modal.is_open) {
            match kind {
                TaskModalKind::Create | TaskModalKind::Edit => self.handle_task_form(kind, action),
                TaskModalKind::Delete => {
                    if self.edit_text_input(&action) {
                        self.confirm_task_delete();
                    }
                }
                TaskModalKind::Share => {
                    if action == KeyAction::Enter {
                        self.close_dialog();
                    }
                }
            }
        } else if let Some(kind) = self.ws.column_modal.kind.filter(|_| self.ws.column_modal.is_open)
        {
            if self.edit_text_input(&action) {
                self.submit_column_dialog(kind);
            }
        } else if self.ws.user_modal.is(UserModalKind::Create) {
            if self.edit_text_input(&action) {
                self.submit_user_dialog();
            }
        } else {
            self.close_dialog();
        }
        false
    }

    /// Apply a keystroke to the text input. True when Enter was pressed.
    fn edit_text_input(&mut self, action: &KeyAction) -> bool {
        match action {
            KeyAction::Enter => return true,
            KeyAction::Backspace => {
                self.text_input.value.pop();
            }
            KeyAction::Char(c) => self.text_input.value.push(*c),
            _ => {}
        }
        self.text_input.error = None;
        false
    }

    fn handle_task_form(&mut self, kind: TaskModalKind, action: KeyAction) {
        if action == KeyAction::Enter {
            self.submit_task_form(kind);
            return;
        }
        let form = &mut self.task_form;
        match action {
            KeyAction::Tab => form.field = form.field.next(),
            KeyAction::Up | KeyAction::Down if !form.field.is_text() => {
                form.cycle(action == KeyAction::Down, self.ws.users.users());
            }
            KeyAction::Backspace => form.pop(),
            KeyAction::Char(c) if form.field.is_text() => form.push(c),
            _ => {}
        }
    }

    fn submit_task_form(&mut self, kind: TaskModalKind) {
        let Some(ctx) = self.ws.task_modal.data.clone() else {
            self.close_dialog();
            return;
        };
        let draft = match self.task_form.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.task_form.error = Some(e.to_string());
                return;
            }
        };
        let result = match (kind, ctx.task) {
            (TaskModalKind::Edit, Some(task)) => {
                self.ws
                    .board
                    .edit_task(&task.id, &ctx.column_id, &patch_from_draft(draft))
                    .map(|()| task.id)
            }
            _ => self
                .ws
                .create_task(&ctx.column_id, draft)
                .map(|task| task.id),
        };
        match result {
            Ok(task_id) => {
                self.close_dialog();
                self.sync();
                self.focus_task(&task_id);
                self.show_status(if kind == TaskModalKind::Edit {
                    "Task updated"
                } else {
                    "Task created"
                });
            }
            Err(e) => self.task_form.error = Some(e.to_string()),
        }
    }

    fn confirm_task_delete(&mut self) {
        let Some(TaskContext {
            column_id,
            task: Some(task),
        }) = self.ws.task_modal.data.clone()
        else {
            self.close_dialog();
            return;
        };
        match self
            .ws
            .delete_task_confirmed(&task.id, &column_id, &self.text_input.value)
        {
            Ok(()) => {
                self.close_dialog();
                self.show_status("Task deleted");
            }
            Err(e) => self.text_input.error = Some(e.to_string()),
        }
    }

    fn submit_column_dialog(&mut self, kind: ColumnModalKind) {
        let value = self.text_input.value.clone();
        let column = self.ws.column_modal.data.clone();
        let result = match (kind, column) {
            (ColumnModalKind::Create, _) => self.ws.create_column(&value).map(|column| {
                self.focus_column(&column.id);
                "Column created"
            }),
            (ColumnModalKind::Edit, Some(column)) => {
                flowboard_core::validation::validate_column_title(&value)
                    .and_then(|()| {
                        self.ws
                            .board
                            .edit_column(&column.id, &ColumnPatch::title(value))
                    })
                    .map(|()| "Column updated")
            }
            (ColumnModalKind::Delete, Some(column)) => self
                .ws
                .delete_column_confirmed(&column.id, &value)
                .map(|()| "Column deleted"),
            _ => Ok(""),
        };
        match result {
            Ok(msg) => {
                self.close_dialog();
                if !msg.is_empty() {
                    self.show_status(msg);
                }
            }
            Err(e) => self.text_input.error = Some(e.to_string()),
        }
    }

    fn submit_user_dialog(&mut self) {
        match self.ws.create_user(&self.text_input.value) {
            Ok(user) => {
                self.close_dialog();
                self.members_index = self.ws.users.users().len().saturating_sub(1);
                self.show_status(format!("Added {}", user.name));
            }
            Err(e) => self.text_input.error = Some(e.to_string()),
        }
    }

    fn handle_members_mode(&mut self, action: KeyAction) -> bool {
        let count = self.ws.users.users().len();
        match action {
            KeyAction::Escape | KeyAction::Char('u') => {
                self.ws.members_drawer.close();
                self.mode = AppMode::Normal;
            }
            KeyAction::Up | KeyAction::Char('k') => {
                self.members_index = self.members_index.saturating_sub(1);
            }
            KeyAction::Down | KeyAction::Char('j') => {
                self.members_index = (self.members_index + 1).min(count.saturating_sub(1));
            }
            KeyAction::Char('a') => {
                self.text_input.clear();
                self.ws.user_modal.open(UserModalKind::Create, None);
                self.mode = AppMode::Dialog;
            }
            KeyAction::Char('d') => {
                if let Some(user) = self.ws.users.users().get(self.members_index).cloned() {
                    match self.ws.remove_user(&user.id) {
                        Ok(_) => self.show_status(format!("Removed {}", user.name)),
                        Err(e) => debug!(error = %e, "remove ignored"),
                    }
                    self.members_index = self
                        .members_index
                        .min(self.ws.users.users().len().saturating_sub(1));
                }
            }
            _ => {}
        }
        false
    }

    // Keyboard drag

    fn start_grab(&mut self, active: DragId) {
        if self.ws.drag_start(&active) {
            self.show_status("Move with h/j/k/l, Enter to drop, Esc to cancel");
            self.grab = Some(Grab { active, over: None });
            self.mode = AppMode::Grab;
        }
    }

    fn handle_grab_mode(&mut self, action: KeyAction) -> bool {
        let Some(grab) = self.grab.clone() else {
            self.mode = AppMode::Normal;
            return false;
        };
        match action {
            KeyAction::Enter => self.finish_grab(grab.active, grab.over),
            KeyAction::Escape => self.finish_grab(grab.active, None),
            KeyAction::Left | KeyAction::Char('h') => self.grab_step(&grab, -1, 0),
            KeyAction::Right | KeyAction::Char('l') => self.grab_step(&grab, 1, 0),
            KeyAction::Up | KeyAction::Char('k') => self.grab_step(&grab, 0, -1),
            KeyAction::Down | KeyAction::Char('j') => self.grab_step(&grab, 0, 1),
            _ => {}
        }
        false
    }

    /// Hover the neighbour in the given direction.
    fn grab_step(&mut self, grab: &Grab, columns: isize, tasks: isize) {
        let visible: Vec<String> = self.visible_columns().iter().map(|c| c.id.clone()).collect();
        match &grab.active {
            DragId::Task(task_id) => {
                if columns != 0 {
                    let target = self
                        .cursor
                        .column
                        .checked_add_signed(columns)
                        .and_then(|i| visible.get(i));
                    if let Some(column_id) = target {
                        let over = DragId::Column(column_id.clone());
                        let effect = self.ws.drag_over(&grab.active, &over);
                        if effect != DragEffect::None {
                            self.sync();
                            self.focus_task(task_id);
                        }
                        self.set_grab_over(None);
                    }
                } else {
                    let Some(column_id) = visible.get(self.cursor.column) else {
                        return;
                    };
                    let tasks_here: Vec<String> = self
                        .ws
                        .board
                        .filtered_tasks(column_id)
                        .iter()
                        .map(|t| t.id.clone())
                        .collect();
                    if let Some(next) = self.cursor.task.checked_add_signed(tasks)
                        && let Some(over_id) = tasks_here.get(next)
                    {
                        self.cursor.task = next;
                        let over = (over_id != task_id).then(|| DragId::Task(over_id.clone()));
                        self.set_grab_over(over);
                    }
                }
            }
            DragId::Column(column_id) => {
                if let Some(next) = self.cursor.column.checked_add_signed(columns)
                    && let Some(over_id) = visible.get(next)
                {
                    self.cursor = Cursor {
                        column: next,
                        task: 0,
                    };
                    let over = (over_id != column_id).then(|| DragId::Column(over_id.clone()));
                    self.set_grab_over(over);
                }
            }
        }
    }

    fn set_grab_over(&mut self, over: Option<DragId>) {
        if let Some(grab) = self.grab.as_mut() {
            grab.over = over;
        }
    }

    fn finish_grab(&mut self, active: DragId, over: Option<DragId>) {
        let effect = self.ws.drag_end(&active, over.as_ref());
        self.grab = None;
        self.mode = AppMode::Normal;
        self.sync();
        match &active {
            DragId::Task(task_id) => self.focus_task(task_id),
            DragId::Column(column_id) => self.focus_column(column_id),
        }
        self.describe_drop(&effect);
    }

    fn describe_drop(&mut self, effect: &DragEffect) {
        match effect {
            DragEffect::ColumnMoved { from, to } => {
                self.show_status(format!("Column moved {} -> {}", from + 1, to + 1))
            }
            DragEffect::TaskReordered { to, .. } => {
                self.show_status(format!("Task moved to position {}", to + 1))
            }
            _ => self.show_status("Dropped"),
        }
    }

    pub fn drop_target(&self) -> Option<&DragId> {
        self.grab
            .as_ref()
            .and_then(|g| g.over.as_ref())
            .or_else(|| self.mouse_drag.as_ref().and_then(|d| d.over.as_ref()))
    }

    // Mouse

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != AppMode::Normal {
            return;
        }
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(active) = self.hits.drag_source(x, y) else {
                    return;
                };
                match &active {
                    DragId::Task(id) => self.focus_task(id),
                    DragId::Column(id) => self.focus_column(id),
                }
                if self.ws.drag_start(&active) {
                    self.mouse_drag = Some(MouseDrag { active, over: None });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = self.mouse_drag.as_mut() else {
                    return;
                };
                let over = self.hits.drop_target(x, y);
                if over != drag.over {
                    if let Some(target) = &over {
                        self.ws.drag_over(&drag.active, target);
                    }
                    drag.over = over;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.mouse_drag.take() {
                    let over = self.hits.drop_target(x, y);
                    let effect = self.ws.drag_end(&drag.active, over.as_ref());
                    self.sync();
                    if let DragId::Task(id) = &drag.active {
                        self.focus_task(id);
                    }
                    if effect != DragEffect::None {
                        self.describe_drop(&effect);
                    }
                }
            }
            _ => {}
        }
        self.sync();
    }

    pub fn share_url(&self) -> Option<String> {
        let ctx = self.ws.task_modal.data.as_ref()?;
        let task = ctx.task.as_ref()?;
        Some(self.ws.share_url(&ctx.column_id, &task.id))
    }

    pub fn is_form_field(&self, field: TaskField) -> bool {
        self.task_form.field == field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default())
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            let action = match c {
                '\n' => KeyAction::Enter,
                '\t' => KeyAction::Tab,
                '\x1b' => KeyAction::Escape,
                c => KeyAction::Char(c),
            };
            app.handle_key_action(action).unwrap();
        }
    }

    fn ids(app: &App, column_id: &str) -> Vec<String> {
        app.ws
            .board
            .column(column_id)
            .map(|c| c.tasks.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_navigation_clamps() {
        let mut app = app();
        press(&mut app, "llllj");
        assert_eq!(app.cursor, Cursor { column: 2, task: 1 });
        assert_eq!(app.current_task().map(|t| t.id.as_str()), Some("6"));
        press(&mut app, "hhhhkkk");
        assert_eq!(app.cursor, Cursor::default());
    }

    #[test]
    fn test_add_task_shows_validation_inline() {
        let mut app = app();
        press(&mut app, "a\n");
        assert_eq!(app.mode, AppMode::Dialog);
        assert_eq!(
            app.task_form.error.as_deref(),
            Some("title: Title is required")
        );

        press(&mut app, "Write tests\tCover the store\n");
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(ids(&app, "todo").len(), 3);
        assert_eq!(app.current_task().map(|t| t.title.as_str()), Some("Write tests"));
    }

    #[test]
    fn test_delete_column_requires_title() {
        let mut app = app();
        press(&mut app, "lDin progress\n");
        assert!(app.text_input.error.is_some());
        assert!(app.ws.board.column("in-progress").is_some());

        app.text_input.clear();
        press(&mut app, "In Progress\n");
        assert!(app.ws.board.column("in-progress").is_none());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_search_filters_and_escape_clears() {
        let mut app = app();
        press(&mut app, "/schema");
        assert_eq!(app.ws.board.filtered_tasks("todo").len(), 0);
        assert_eq!(app.ws.board.filtered_tasks("done").len(), 1);
        press(&mut app, "\x1b");
        assert!(!app.ws.board.filters().is_active());
    }

    #[test]
    fn test_keyboard_grab_moves_task_across_and_within() {
        let mut app = app();
        // Grab task 1 and carry it into In Progress
        press(&mut app, "ml");
        assert_eq!(ids(&app, "in-progress"), ["3", "4", "1"]);
        assert_eq!(app.cursor, Cursor { column: 1, task: 2 });

        // Hover task 3 and drop
        press(&mut app, "kk\n");
        assert_eq!(ids(&app, "in-progress"), ["1", "3", "4"]);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.ws.drag.is_dragging());
        assert_eq!(app.current_task().map(|t| t.id.as_str()), Some("1"));
    }

    #[test]
    fn test_keyboard_grab_column() {
        let mut app = app();
        press(&mut app, "Mll\n");
        let order: Vec<_> = app.ws.board.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, ["in-progress", "done", "todo"]);
        assert_eq!(app.cursor.column, 2);
    }

    #[test]
    fn test_archive_hides_until_shown() {
        let mut app = app();
        press(&mut app, "X");
        assert_eq!(app.visible_columns().len(), 2);
        assert_eq!(app.current_column().map(|c| c.id.as_str()), Some("in-progress"));

        press(&mut app, "oa\x1b");
        assert_eq!(app.visible_columns().len(), 3);
    }

    #[test]
    fn test_members_drawer_add_and_remove() {
        let mut app = app();
        press(&mut app, "uaAda Lovelace\n");
        assert_eq!(app.mode, AppMode::Members);
        assert_eq!(app.ws.users.users().len(), 5);

        app.members_index = 0;
        press(&mut app, "d");
        assert!(app.ws.users.get("1").is_none());
        assert!(ids(&app, "in-progress").iter().all(|id| {
            app.ws.board.board().find_task(id).unwrap().1.assignee_id.as_deref() != Some("1")
        }));
    }

    #[test]
    fn test_share_dialog_uses_config_base() {
        let mut app = app();
        press(&mut app, "jS");
        assert_eq!(app.share_url().as_deref(), Some("http://localhost:3000/todo/2"));
    }

    #[test]
    fn test_status_expires_on_tick() {
        let mut app = app();
        app.show_status("hello");
        app.status_message_time = Some(Instant::now() - Duration::from_secs(4));
        app.on_tick();
        assert!(app.status_message.is_none());
    }
}
