//! Sample board and roster loaded at startup

use crate::{Board, Column, Priority, Task, User};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn task(
    id: &str,
    title: &str,
    description: &str,
    priority: Priority,
    assignee: Option<&str>,
    due: Option<NaiveDate>,
) -> Task {
    let mut task = Task::new(id, title, description, priority);
    task.assignee_id = assignee.map(str::to_string);
    task.due_date = due;
    task
}

/// Three columns, two tasks each.
pub fn sample_board() -> Board {
    Board::new(vec![
        Column::new("todo", "Todo").with_tasks(vec![
            task(
                "1",
                "Research competitors",
                "Look into what our competitors are doing",
                Priority::Medium,
                None,
                date(2025, 4, 30),
            ),
            task(
                "2",
                "Design new landing page",
                "Create wireframes for the new landing page",
                Priority::High,
                None,
                date(2025, 4, 30),
            ),
        ]),
        Column::new("in-progress", "In Progress").with_tasks(vec![
            task(
                "3",
                "Implement authentication",
                "Add login and registration functionality",
                Priority::High,
                Some("1"),
                date(2025, 4, 20),
            ),
            task(
                "4",
                "Write documentation",
                "Document the API endpoints",
                Priority::Low,
                Some("3"),
                date(2025, 4, 15),
            ),
        ]),
        Column::new("done", "Done").with_tasks(vec![
            task(
                "5",
                "Setup project repository",
                "Initialize Git repo and configure CI/CD",
                Priority::Medium,
                Some("1"),
                date(2025, 4, 5),
            ),
            task(
                "6",
                "Create database schema",
                "Design and implement the initial database schema",
                Priority::High,
                Some("2"),
                date(2025, 4, 10),
            ),
        ]),
    ])
}

pub fn sample_users() -> Vec<User> {
    vec![
        User::new("1", "John Doe"),
        User::new("2", "Jane Smith"),
        User::new("3", "Robert Johnson"),
        User::new("4", "Emily Davis"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_ids_unique() {
        let board = sample_board();
        let mut seen = HashSet::new();
        for column in &board.columns {
            assert!(seen.insert(column.id.clone()));
            for task in &column.tasks {
                assert!(seen.insert(task.id.clone()));
            }
        }
        assert_eq!(board.task_count(), 6);
    }

    #[test]
    fn test_sample_assignees_exist() {
        let users: HashSet<_> = sample_users().into_iter().map(|u| u.id).collect();
        for column in sample_board().columns {
            for task in column.tasks {
                if let Some(id) = task.assignee_id {
                    assert!(users.contains(&id));
                }
            }
        }
    }
}
