//! Rendering
//!
//! Drawing also records where each column and card landed so mouse
//! gestures can be resolved to drag ids.

use crate::app::{App, AppMode};
use crate::form::TaskField;
use chrono::Local;
use flowboard_core::{
    ActiveItem, Column, ColumnModalKind, DragId, Priority, Task, TaskModalKind, UserModalKind,
    ViewOption,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

/// Screen areas from the last frame
#[derive(Debug, Default)]
pub struct HitMap {
    columns: Vec<(Rect, String)>,
    headers: Vec<(Rect, String)>,
    cards: Vec<(Rect, String)>,
}

impl HitMap {
    fn clear(&mut self) {
        self.columns.clear();
        self.headers.clear();
        self.cards.clear();
    }

    /// What a press at (x, y) picks up: a card, or a column by its header.
    pub fn drag_source(&self, x: u16, y: u16) -> Option<DragId> {
        let pos = Position::new(x, y);
        find(&self.cards, pos)
            .map(DragId::Task)
            .or_else(|| find(&self.headers, pos).map(DragId::Column))
    }

    /// What a drag at (x, y) is over: a card, or anywhere in a column.
    pub fn drop_target(&self, x: u16, y: u16) -> Option<DragId> {
        let pos = Position::new(x, y);
        find(&self.cards, pos)
            .map(DragId::Task)
            .or_else(|| find(&self.columns, pos).map(DragId::Column))
    }
}

fn find(areas: &[(Rect, String)], pos: Position) -> Option<String> {
    areas
        .iter()
        .find(|(area, _)| area.contains(pos))
        .map(|(_, id)| id.clone())
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    app.hits.clear();
    render_board(f, app, main_chunks[0]);
    render_status_bar(f, app, main_chunks[1]);

    match app.mode {
        AppMode::Help => render_help_overlay(f),
        AppMode::Filter => render_filter_overlay(f, app),
        AppMode::Settings => render_settings_overlay(f, app),
        AppMode::Dialog => render_dialog(f, app),
        AppMode::Members => render_members_drawer(f, app),
        _ => {}
    }
}

fn fg(app: &App, color: Color) -> Style {
    if app.config.display.colors {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

fn check(enabled: bool) -> &'static str {
    if enabled { "[x]" } else { "[ ]" }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn render_board(f: &mut Frame, app: &mut App, area: Rect) {
    let width = app.config.display.column_width.max(12);
    let columns: Vec<Column> = app.visible_columns().into_iter().cloned().collect();

    if columns.is_empty() {
        let empty = Paragraph::new("No columns. Press A to add one.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("flowboard"));
        f.render_widget(empty, area);
        return;
    }

    let fits = usize::from((area.width / width).max(1));
    let offset = app.cursor.column.saturating_sub(fits - 1);
    let shown: Vec<&Column> = columns.iter().skip(offset).take(fits).collect();

    let mut constraints: Vec<Constraint> = shown.iter().map(|_| Constraint::Length(width)).collect();
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, column) in shown.into_iter().enumerate() {
        render_column(f, app, column, offset + i, chunks[i]);
    }
}

fn card_height(app: &App) -> u16 {
    let view = app.ws.board.view_options();
    let meta = view.show_priority || view.show_due_dates || view.show_assignees;
    3 + u16::from(view.show_description) + u16::from(meta)
}

fn render_column(f: &mut Frame, app: &mut App, column: &Column, index: usize, area: Rect) {
    let selected = index == app.cursor.column;
    let is_target = app.drop_target() == Some(&DragId::Column(column.id.clone()));
    let is_dragged = matches!(app.ws.drag.active(), Some(ActiveItem::Column(c)) if c.id == column.id);
    let tasks: Vec<Task> = app
        .ws
        .board
        .filtered_tasks(&column.id)
        .into_iter()
        .cloned()
        .collect();

    let mut title = format!(" {} ({}) ", column.title, tasks.len());
    if let Some(direction) = app.ws.board.sort_direction(&column.id) {
        title.push_str(&format!("[{}] ", direction));
    }
    if column.is_archived() {
        title.push_str("[archived] ");
    }

    let border = if is_target || is_dragged {
        fg(app, Color::Yellow).add_modifier(Modifier::BOLD)
    } else if selected {
        fg(app, Color::Cyan).add_modifier(Modifier::BOLD)
    } else if column.is_archived() {
        fg(app, Color::DarkGray)
    } else {
        fg(app, Color::Blue)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    app.hits.columns.push((area, column.id.clone()));
    app.hits.headers.push((
        Rect {
            height: 1,
            ..area
        },
        column.id.clone(),
    ));

    let height = card_height(app);
    let max_fit = usize::from(inner.height / height);
    if max_fit == 0 {
        return;
    }
    let skip = if selected {
        app.cursor.task.saturating_sub(max_fit - 1)
    } else {
        0
    };

    for (slot, (i, task)) in tasks.iter().enumerate().skip(skip).take(max_fit).enumerate() {
        let card = Rect {
            x: inner.x,
            y: inner.y + slot as u16 * height,
            width: inner.width,
            height,
        };
        render_card(f, app, task, selected && i == app.cursor.task, card);
        app.hits.cards.push((card, task.id.clone()));
    }
    if tasks.len() > skip + max_fit {
        let more = Paragraph::new(format!("+{} more", tasks.len() - skip - max_fit))
            .style(fg(app, Color::DarkGray))
            .alignment(Alignment::Right);
        let last = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };
        f.render_widget(more, last);
    }
}

fn render_card(f: &mut Frame, app: &App, task: &Task, selected: bool, area: Rect) {
    let view = *app.ws.board.view_options();
    let width = usize::from(area.width.saturating_sub(2));
    let is_target = app.drop_target() == Some(&DragId::Task(task.id.clone()));
    let is_dragged = app.ws.drag.active_task().is_some_and(|t| t.id == task.id);

    let border = if is_dragged {
        fg(app, Color::Magenta).add_modifier(Modifier::BOLD)
    } else if is_target {
        fg(app, Color::Yellow)
    } else if selected {
        fg(app, Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if task.is_archived() {
        title_style = fg(app, Color::DarkGray).add_modifier(Modifier::DIM);
    }

    let mut lines = vec![Line::from(Span::styled(truncate(&task.title, width), title_style))];

    if view.show_description {
        lines.push(Line::from(Span::styled(
            truncate(&task.description, width),
            fg(app, Color::Gray),
        )));
    }

    let mut meta = Vec::new();
    if view.show_priority {
        meta.push(Span::styled(
            format!("[{}] ", task.priority),
            fg(app, priority_color(task.priority)).add_modifier(Modifier::BOLD),
        ));
    }
    if view.show_due_dates
        && let Some(due) = task.due_date
    {
        let style = if task.is_overdue(Local::now().date_naive()) {
            fg(app, Color::Red)
        } else {
            Style::default()
        };
        meta.push(Span::styled(
            format!("{} ", app.config.display.format_date(due)),
            style,
        ));
    }
    if view.show_assignees
        && let Some(ref user_id) = task.assignee_id
    {
        let initials = app
            .ws
            .users
            .get(user_id)
            .map(|u| u.initials())
            .unwrap_or_else(|| "?".to_string());
        meta.push(Span::styled(format!("@{}", initials), fg(app, Color::Magenta)));
    }
    if !meta.is_empty() {
        lines.push(Line::from(meta));
    }

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(card, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mode_text = match app.mode {
        AppMode::Normal => "[NORMAL]",
        AppMode::Search => "[SEARCH]",
        AppMode::Help => "[HELP]",
        AppMode::Filter => "[FILTER]",
        AppMode::Settings => "[SETTINGS]",
        AppMode::Dialog => "[DIALOG]",
        AppMode::Members => "[MEMBERS]",
        AppMode::Grab => "[MOVE]",
    };

    let mode_style = match app.mode {
        AppMode::Normal => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" | ")];

    if app.mode == AppMode::Search {
        spans.push(Span::raw(format!("/{}_", app.search_input)));
    } else if let Some(ref msg) = app.status_message {
        spans.push(Span::styled(msg, Style::default().fg(Color::Cyan)));
    } else {
        if app.ws.board.filters().is_active() {
            spans.push(Span::styled("filtered | ", Style::default().fg(Color::Yellow)));
        }
        match app.ws.drag.active() {
            Some(ActiveItem::Task(task)) => spans.push(Span::raw(format!("moving {} | ", task.title))),
            Some(ActiveItem::Column(column)) => {
                spans.push(Span::raw(format!("moving {} | ", column.title)))
            }
            None => {}
        }
        spans.push(Span::raw(
            "[a]dd [e]dit [d]elete [m]ove [s]ort [/]search [f]ilter [o]ptions [?]help [q]uit",
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black))
        .title(title)
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    ))
}

fn render_help_overlay(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let help_text = vec![
        heading("Keyboard Shortcuts"),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  h/j/k/l, arrows   Move between columns and cards"),
        Line::from("  m / M             Move card / column (h/j/k/l, Enter drops, Esc cancels)"),
        Line::from("  mouse drag        Drag cards and column headers"),
        Line::from(""),
        Line::from("Cards:"),
        Line::from("  a  Add    e  Edit    d  Delete    y  Duplicate"),
        Line::from("  x  Archive / restore    S  Share link"),
        Line::from(""),
        Line::from("Columns:"),
        Line::from("  A  Add    E  Rename  D  Delete    Y  Duplicate"),
        Line::from("  X  Archive / restore    s  Sort by priority"),
        Line::from(""),
        Line::from("View:"),
        Line::from("  /  Search    f  Filters    o  Settings    u  Members"),
        Line::from("  ?  Help      q  Quit       Esc  Close"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(overlay_block("Help (press Esc to close)"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_filter_overlay(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 70, f.area());
    f.render_widget(Clear, area);

    let filters = app.ws.board.filters();
    let mut text = vec![
        heading("Filter Options"),
        Line::from(""),
        Line::from(Span::styled("Priority:", Style::default().add_modifier(Modifier::BOLD))),
    ];
    for (key, priority) in [('H', Priority::High), ('M', Priority::Medium), ('L', Priority::Low)] {
        text.push(Line::from(format!(
            "  [{}] {} {}",
            key,
            check(filters.priorities.contains(&priority)),
            priority
        )));
    }

    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Assignee:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    text.push(Line::from(format!(
        "  [0] {} Unassigned",
        check(filters.show_unassigned)
    )));
    for (i, user) in app.ws.users.users().iter().take(9).enumerate() {
        text.push(Line::from(format!(
            "  [{}] {} {}",
            i + 1,
            check(filters.assignees.contains(&user.id)),
            user.name
        )));
    }

    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled("[c]", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear all   "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Close"),
    ]));

    let paragraph = Paragraph::new(text).block(overlay_block("Filter (toggles apply immediately)"));
    f.render_widget(paragraph, area);
}

fn render_settings_overlay(f: &mut Frame, app: &App) {
    let area = centered_rect(40, 40, f.area());
    f.render_widget(Clear, area);

    let view = app.ws.board.view_options();
    let mut text = vec![
        heading("View Settings"),
        Line::from(""),
        Line::from(format!(
            "  [a] {} Show archived",
            check(app.ws.board.filters().show_archived)
        )),
    ];
    for (i, option) in ViewOption::ALL.into_iter().enumerate() {
        text.push(Line::from(format!(
            "  [{}] {} {}",
            i + 1,
            check(view.get(option)),
            option.label()
        )));
    }

    let paragraph = Paragraph::new(text).block(overlay_block("Settings"));
    f.render_widget(paragraph, area);
}

fn render_dialog(f: &mut Frame, app: &App) {
    let ws = &app.ws;
    if ws.task_modal.is_open {
        match ws.task_modal.kind {
            Some(TaskModalKind::Create) => render_task_form(f, app, "Add Task"),
            Some(TaskModalKind::Edit) => render_task_form(f, app, "Edit Task"),
            Some(TaskModalKind::Delete) => {
                let title = ws
                    .task_modal
                    .data
                    .as_ref()
                    .and_then(|ctx| ctx.task.as_ref())
                    .map(|t| t.title.as_str())
                    .unwrap_or_default();
                render_confirm(f, app, "Delete Task", title);
            }
            Some(TaskModalKind::Share) => render_share(f, app),
            None => {}
        }
    } else if ws.column_modal.is_open {
        let current = ws.column_modal.data.as_ref().map(|c| c.title.as_str()).unwrap_or_default();
        match ws.column_modal.kind {
            Some(ColumnModalKind::Create) => render_text_form(f, app, "Add Column", "Name"),
            Some(ColumnModalKind::Edit) => render_text_form(f, app, "Rename Column", "Name"),
            Some(ColumnModalKind::Delete) => render_confirm(f, app, "Delete Column", current),
            None => {}
        }
    } else if ws.user_modal.is(UserModalKind::Create) {
        render_text_form(f, app, "Add Member", "Name");
    }
}

fn error_line(error: &Option<String>) -> Line<'_> {
    match error {
        Some(msg) => Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Red))),
        None => Line::from(""),
    }
}

fn save_hint() -> Line<'static> {
    Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ])
}

fn render_task_form(f: &mut Frame, app: &App, title: &str) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let form = &app.task_form;
    let label = |field: TaskField, text: &'static str| {
        let style = if app.is_form_field(field) {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Span::styled(text, style)
    };
    let cursor = |field: TaskField| if app.is_form_field(field) { "_" } else { "" };

    let assignee = form
        .assignee_id
        .as_deref()
        .map(|id| app.ws.users.name_of(id).unwrap_or(id).to_string())
        .unwrap_or_else(|| "Unassigned".to_string());

    let text = vec![
        heading(title),
        Line::from(""),
        Line::from(vec![
            label(TaskField::Title, "Title: "),
            Span::raw(form.title.as_str()),
            Span::raw(cursor(TaskField::Title)),
        ]),
        Line::from(vec![
            label(TaskField::Description, "Description: "),
            Span::raw(form.description.as_str()),
            Span::raw(cursor(TaskField::Description)),
        ]),
        Line::from(vec![
            label(TaskField::Priority, "Priority: "),
            Span::styled(
                format!("[{}]", form.priority),
                Style::default().fg(priority_color(form.priority)),
            ),
            Span::raw(" (↑/↓ to change)"),
        ]),
        Line::from(vec![
            label(TaskField::Assignee, "Assignee: "),
            Span::raw(format!("[{}]", assignee)),
            Span::raw(" (↑/↓ to change)"),
        ]),
        Line::from(vec![
            label(TaskField::DueDate, "Due date: "),
            Span::raw(form.due_date.as_str()),
            Span::raw(cursor(TaskField::DueDate)),
            Span::styled("  YYYY-MM-DD", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        error_line(&form.error),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" Save  "),
            Span::styled("[Esc]", Style::default().fg(Color::Red)),
            Span::raw(" Cancel  "),
            Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
            Span::raw(" Next field"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .style(Style::default().bg(Color::Black))
                .title(title),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_text_form(f: &mut Frame, app: &App, title: &str, field: &str) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let text = vec![
        heading(title),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{}: ", field), Style::default().fg(Color::Cyan)),
            Span::raw(app.text_input.value.as_str()),
            Span::raw("_"),
        ]),
        Line::from(""),
        error_line(&app.text_input.error),
        save_hint(),
    ];
    f.render_widget(Paragraph::new(text).block(overlay_block(title)), area);
}

fn render_confirm(f: &mut Frame, app: &App, title: &str, expected: &str) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Type "),
            Span::styled(expected, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to confirm:"),
        ]),
        Line::from(vec![Span::raw(app.text_input.value.as_str()), Span::raw("_")]),
        Line::from(""),
        error_line(&app.text_input.error),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Red)),
            Span::raw(" Delete  "),
            Span::styled("[Esc]", Style::default().fg(Color::Green)),
            Span::raw(" Cancel"),
        ]),
    ];
    f.render_widget(
        Paragraph::new(text)
            .block(overlay_block(title))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_share(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 25, f.area());
    f.render_widget(Clear, area);

    let url = app.share_url().unwrap_or_default();
    let text = vec![
        heading("Share Task"),
        Line::from(""),
        Line::from(Span::styled(url, Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from("[Enter/Esc] Close"),
    ];
    f.render_widget(
        Paragraph::new(text)
            .block(overlay_block("Share"))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_members_drawer(f: &mut Frame, app: &App) {
    let full = f.area();
    let width = (full.width / 3).max(28).min(full.width);
    let area = Rect {
        x: full.width - width,
        y: 0,
        width,
        height: full.height.saturating_sub(1),
    };
    f.render_widget(Clear, area);

    let mut items: Vec<ListItem> = app
        .ws
        .users
        .users()
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let prefix = if i == app.members_index { "> " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(
                    format!("{:>2} ", user.initials()),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(user.name.as_str()),
            ]))
        })
        .collect();
    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::from(vec![
        Span::styled("[a]", Style::default().fg(Color::Green)),
        Span::raw(" Add  "),
        Span::styled("[d]", Style::default().fg(Color::Red)),
        Span::raw(" Remove  "),
        Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
        Span::raw(" Close"),
    ])));

    let list = List::new(items).block(overlay_block("Members"));
    f.render_widget(list, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowboard_core::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_board_renders_columns_and_cards() {
        let mut app = App::new(Config::default());
        let screen = render(&mut app);
        assert!(screen.contains("Todo (2)"));
        assert!(screen.contains("In Progress (2)"));
        assert!(screen.contains("Research competitors"));
        assert!(screen.contains("@JD"));
    }

    #[test]
    fn test_hit_map_resolves_cards_and_headers() {
        let mut app = App::new(Config::default());
        render(&mut app);

        let (card, id) = app.hits.cards[0].clone();
        assert_eq!(app.hits.drag_source(card.x + 1, card.y + 1), Some(DragId::task(id)));

        let (header, column) = app.hits.headers[1].clone();
        assert_eq!(
            app.hits.drag_source(header.x + 2, header.y),
            Some(DragId::column(column.clone()))
        );

        let (area, _) = app.hits.columns[1];
        let bottom = area.y + area.height - 2;
        assert_eq!(app.hits.drop_target(area.x + 2, bottom), Some(DragId::column(column)));
        assert_eq!(app.hits.drag_source(area.x + 2, bottom), None);
    }

    #[test]
    fn test_malformed_date_format_renders_iso() {
        let mut config = Config::default();
        config.display.date_format = "%Q".to_string();
        let mut app = App::new(config);
        let screen = render(&mut app);
        assert!(screen.contains("Research competitors"));
        assert!(screen.contains("2025-04-30"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ärger über", 5), "ärge…");
    }
}
