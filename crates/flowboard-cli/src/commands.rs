use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use flowboard_core::{Column, Command, Config, Task, Workspace};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Archived")]
    archived: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Initials")]
    initials: String,
    #[tabled(rename = "Tasks")]
    tasks: usize,
}

/// What happened to one script line
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Applied,
    NotFound,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct Outcome {
    pub line: usize,
    pub op: &'static str,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn show(config: &Config, filtered: bool, json: bool) -> Result<()> {
    let ws = Workspace::new(config);
    print_board(&ws, config, filtered, json)
}

pub fn replay(config: &Config, file: &Path, filtered: bool, json: bool) -> Result<()> {
    let script = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut ws = Workspace::new(config);
    let outcomes = run_script(&mut ws, &script)?;

    if json {
        let output = serde_json::json!({
            "outcomes": outcomes,
            "columns": board_columns(&ws, filtered),
            "filters": ws.board.filters(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for outcome in &outcomes {
        let detail = outcome.detail.as_deref().unwrap_or_default();
        match outcome.status {
            Status::Applied => println!("{} {:>3} {}", "✓".green(), outcome.line, outcome.op),
            Status::NotFound => println!(
                "{} {:>3} {} {}",
                "-".yellow(),
                outcome.line,
                outcome.op,
                detail.dimmed()
            ),
            Status::Failed => println!(
                "{} {:>3} {} {}",
                "✗".red(),
                outcome.line,
                outcome.op,
                detail.red()
            ),
        }
    }
    println!();
    print_board(&ws, config, filtered, false)
}

/// Apply a JSON-lines script. Blank lines and `#` comments are skipped.
/// A line that does not parse aborts the run; a rejected command is
/// recorded and the script continues.
pub fn run_script(ws: &mut Workspace, script: &str) -> Result<Vec<Outcome>> {
    let mut outcomes = Vec::new();

    for (idx, line) in script.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command =
            Command::from_json(line).with_context(|| format!("line {line_no}: invalid command"))?;
        let (status, detail) = match command.apply(ws) {
            Ok(()) => (Status::Applied, None),
            Err(e) if e.is_not_found() => (Status::NotFound, Some(e.to_string())),
            Err(e) => (Status::Failed, Some(e.to_string())),
        };
        tracing::debug!(line = line_no, op = command.name(), ?status, "replayed");
        outcomes.push(Outcome {
            line: line_no,
            op: command.name(),
            status,
            detail,
        });
    }

    Ok(outcomes)
}

/// Columns as they would be printed. With `filtered`, hidden columns
/// are dropped and each column keeps only the tasks the filters pass.
fn board_columns(ws: &Workspace, filtered: bool) -> Vec<Column> {
    let store = &ws.board;
    if !filtered {
        return store.columns().to_vec();
    }
    store
        .columns()
        .iter()
        .filter(|column| store.filters().column_visible(column))
        .map(|column| Column {
            tasks: store.filtered_tasks(&column.id).into_iter().cloned().collect(),
            ..column.clone()
        })
        .collect()
}

fn print_board(ws: &Workspace, config: &Config, filtered: bool, json: bool) -> Result<()> {
    let columns = board_columns(ws, filtered);

    if json {
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }

    if columns.is_empty() {
        println!("No columns");
        return Ok(());
    }

    for column in &columns {
        let mut header = format!("{} ({})", column.title.bold(), column.tasks.len());
        if let Some(direction) = ws.board.sort_direction(&column.id) {
            let _ = write!(header, " {}", direction.to_string().cyan());
        }
        if column.is_archived() {
            let _ = write!(header, " {}", "[archived]".dimmed());
        }
        println!("{header}  {}", column.id.dimmed());

        if column.tasks.is_empty() {
            println!("  {}", "(empty)".dimmed());
        } else {
            let rows: Vec<TaskRow> = column
                .tasks
                .iter()
                .map(|task| task_row(ws, config, task))
                .collect();
            println!("{}", Table::new(rows));
        }
        println!();
    }
    Ok(())
}

fn task_row(ws: &Workspace, config: &Config, task: &Task) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        title: task.title.clone(),
        priority: task.priority.to_string(),
        assignee: task
            .assignee_id
            .as_deref()
            .map(|id| ws.users.name_of(id).unwrap_or(id).to_string())
            .unwrap_or_default(),
        due: task
            .due_date
            .map(|date| config.display.format_date(date))
            .unwrap_or_default(),
        archived: if task.is_archived() { "yes" } else { "" }.to_string(),
    }
}

pub fn users(config: &Config, json: bool) -> Result<()> {
    let ws = Workspace::new(config);
    let users = ws.users.users();

    if json {
        println!("{}", serde_json::to_string_pretty(users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No users");
        return Ok(());
    }

    let rows: Vec<UserRow> = users
        .iter()
        .map(|user| UserRow {
            id: user.id.clone(),
            name: user.name.clone(),
            initials: user.initials(),
            tasks: ws
                .board
                .columns()
                .iter()
                .flat_map(|c| &c.tasks)
                .filter(|t| t.assignee_id.as_deref() == Some(user.id.as_str()))
                .count(),
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

pub fn config_show(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

fn lookup(config: &Config, key: &str) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(config)?;
    for part in key.split('.') {
        value = value
            .get_mut(part)
            .map(serde_json::Value::take)
            .ok_or_else(|| anyhow!("Config key not found: {}", key))?;
    }
    Ok(value)
}

pub fn config_get(config: &Config, key: &str, json: bool) -> Result<()> {
    let value = lookup(config, key)?;
    if json {
        println!("{}", serde_json::to_string(&value)?);
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            serde_json::Value::Null => println!("null"),
            other => println!("{}", other),
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid boolean value: {}", value))
}

/// Set one config value and write the file back
pub fn config_set(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(path)?;

    match key {
        "id_prefix" => config.id_prefix = value.to_string(),
        "seed_sample_data" => config.seed_sample_data = parse_bool(value)?,
        "share_base_url" => config.share_base_url = value.to_string(),
        "log_level" => config.log_level = value.to_string(),
        "log_file" => config.log_file = Some(value.into()),
        "view.show_description" => config.view.show_description = parse_bool(value)?,
        "view.show_priority" => config.view.show_priority = parse_bool(value)?,
        "view.show_due_dates" => config.view.show_due_dates = parse_bool(value)?,
        "view.show_assignees" => config.view.show_assignees = parse_bool(value)?,
        "view.show_archived" => config.view.show_archived = parse_bool(value)?,
        "display.colors" => config.display.colors = parse_bool(value)?,
        "display.date_format" => config.display.date_format = value.to_string(),
        "display.column_width" => {
            config.display.column_width = value
                .parse()
                .map_err(|_| anyhow!("Invalid width: {}", value))?;
        }
        _ => bail!("Unknown config key: {}", key),
    }

    config.save(path)?;
    println!("{} Set {} = {}", "✓".green(), key, value);
    Ok(())
}

pub fn config_path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}

pub fn config_init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} Config already exists at {}", "-".yellow(), path.display());
        return Ok(());
    }
    write_default_config(path)?;
    println!("{} Wrote default config to {}", "✓".green(), path.display());
    Ok(())
}

pub fn config_reset(path: &Path) -> Result<()> {
    write_default_config(path)?;
    println!("{} Config reset to defaults", "✓".green());
    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default_with_comments())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_script_records_each_outcome() {
        let mut ws = Workspace::default();
        let script = r#"
# archive a done card, then poke at things that are not there
{"op":"archive_task","task_id":"5","column_id":"done"}
{"op":"delete_column","column_id":"backlog"}
{"op":"drag_start","active":"column-"}
"#;
        let outcomes = run_script(&mut ws, script).unwrap();
        let statuses: Vec<_> = outcomes.iter().map(|o| &o.status).collect();
        assert_eq!(
            statuses,
            [&Status::Applied, &Status::NotFound, &Status::Failed]
        );
        assert_eq!(outcomes[0].line, 3);
        assert_eq!(outcomes[1].op, "delete_column");
        assert!(outcomes[1].detail.is_some());
    }

    #[test]
    fn test_run_script_stops_on_bad_json() {
        let mut ws = Workspace::default();
        let err = run_script(&mut ws, "{\"op\":\"clear_filters\"}\nnot json\n").unwrap_err();
        assert!(err.to_string().starts_with("line 2"));
    }

    #[test]
    fn test_filtered_columns_hide_archived() {
        let mut ws = Workspace::default();
        run_script(
            &mut ws,
            r#"{"op":"archive_column","column_id":"done"}
{"op":"set_search_query","query":"documentation"}"#,
        )
        .unwrap();

        let all = board_columns(&ws, false);
        assert_eq!(all.len(), 3);

        let visible = board_columns(&ws, true);
        assert!(visible.iter().all(|c| c.id != "done"));
        let total: usize = visible.iter().map(|c| c.tasks.len()).sum();
        assert!(total < ws.board.board().task_count());
    }

    #[test]
    fn test_task_row_survives_bad_date_format() {
        let mut config = Config::default();
        config.display.date_format = "%Q".to_string();
        let ws = Workspace::new(&config);
        let task = ws.board.board().find_task("3").unwrap().1;
        let row = task_row(&ws, &config, task);
        assert_eq!(row.due, "2025-04-20");
        assert_eq!(row.assignee, "John Doe");
    }

    #[test]
    fn test_config_set_then_get() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        config_set(&path, "display.date_format", "%d.%m.%Y").unwrap();
        config_set(&path, "view.show_archived", "true").unwrap();
        config_set(&path, "display.column_width", "40").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.display.date_format, "%d.%m.%Y");
        assert!(config.view.show_archived);
        assert_eq!(config.display.column_width, 40);
        assert_eq!(config.id_prefix, "fb");

        assert_eq!(
            lookup(&config, "display.column_width").unwrap(),
            serde_json::json!(40)
        );
        assert!(lookup(&config, "display.nope").is_err());
        assert!(config_set(&path, "view.show_archived", "maybe").is_err());
        assert!(config_set(&path, "nope", "1").is_err());
    }

    #[test]
    fn test_config_init_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        config_init(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, Config::default_with_comments());

        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();
        config_init(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "log_level = \"debug\"\n");

        config_reset(&path).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
    }
}
