//! Task filtering and view options

use crate::{Column, Error, Priority, Task};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Board-wide filter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Free text, matched case-insensitively against title and description
    pub search_query: String,

    /// Empty = all priorities
    pub priorities: BTreeSet<Priority>,

    /// User ids; empty together with `show_unassigned == false` = everyone
    pub assignees: BTreeSet<String>,

    /// Include tasks with no assignee
    pub show_unassigned: bool,

    /// Include archived tasks and columns
    pub show_archived: bool,
}

impl FilterState {
    /// Any of search, priority or assignee filters set.
    /// Archive visibility is a view setting and does not count.
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty()
            || !self.priorities.is_empty()
            || !self.assignees.is_empty()
            || self.show_unassigned
    }

    /// Reset search, priority and assignee filters.
    pub fn clear(&mut self) {
        self.search_query.clear();
        self.priorities.clear();
        self.assignees.clear();
        self.show_unassigned = false;
    }

    pub fn toggle_priority(&mut self, priority: Priority) {
        if !self.priorities.remove(&priority) {
            self.priorities.insert(priority);
        }
    }

    pub fn toggle_assignee(&mut self, user_id: &str) {
        if !self.assignees.remove(user_id) {
            self.assignees.insert(user_id.to_string());
        }
    }

    fn matches_assignee(&self, task: &Task) -> bool {
        if self.assignees.is_empty() && !self.show_unassigned {
            return true;
        }
        match task.assignee_id {
            None => self.show_unassigned,
            Some(ref id) => self.assignees.contains(id),
        }
    }

    /// `needle` is the lowercased search query.
    fn matches_with(&self, task: &Task, needle: &str) -> bool {
        if !self.show_archived && task.is_archived() {
            return false;
        }

        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }

        if !self.matches_assignee(task) {
            return false;
        }

        task.matches_text(needle)
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_with(task, &self.search_query.to_lowercase())
    }

    pub fn column_visible(&self, column: &Column) -> bool {
        self.show_archived || !column.is_archived()
    }

    /// Visible tasks of `column`, in column order.
    pub fn apply<'a>(&self, column: &'a Column) -> Vec<&'a Task> {
        if !self.column_visible(column) {
            return Vec::new();
        }
        let needle = self.search_query.to_lowercase();
        column
            .tasks
            .iter()
            .filter(|t| self.matches_with(t, &needle))
            .collect()
    }
}

/// Card display toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewOption {
    ShowDescription,
    ShowPriority,
    ShowDueDates,
    ShowAssignees,
}

impl ViewOption {
    pub const ALL: [ViewOption; 4] = [
        ViewOption::ShowDescription,
        ViewOption::ShowPriority,
        ViewOption::ShowDueDates,
        ViewOption::ShowAssignees,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewOption::ShowDescription => "Show description",
            ViewOption::ShowPriority => "Show priority",
            ViewOption::ShowDueDates => "Show due dates",
            ViewOption::ShowAssignees => "Show assignees",
        }
    }
}

impl std::str::FromStr for ViewOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show_description" | "showDescription" | "description" => Ok(ViewOption::ShowDescription),
            "show_priority" | "showPriority" | "priority" => Ok(ViewOption::ShowPriority),
            "show_due_dates" | "showDueDates" | "due_dates" => Ok(ViewOption::ShowDueDates),
            "show_assignees" | "showAssignees" | "assignees" => Ok(ViewOption::ShowAssignees),
            _ => Err(Error::InvalidViewOption(s.to_string())),
        }
    }
}

/// Which parts of a card are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub show_description: bool,
    pub show_priority: bool,
    pub show_due_dates: bool,
    pub show_assignees: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_description: true,
            show_priority: true,
            show_due_dates: true,
            show_assignees: true,
        }
    }
}

impl ViewOptions {
    pub fn get(&self, option: ViewOption) -> bool {
        match option {
            ViewOption::ShowDescription => self.show_description,
            ViewOption::ShowPriority => self.show_priority,
            ViewOption::ShowDueDates => self.show_due_dates,
            ViewOption::ShowAssignees => self.show_assignees,
        }
    }

    pub fn set(&mut self, option: ViewOption, value: bool) {
        let slot = match option {
            ViewOption::ShowDescription => &mut self.show_description,
            ViewOption::ShowPriority => &mut self.show_priority,
            ViewOption::ShowDueDates => &mut self.show_due_dates,
            ViewOption::ShowAssignees => &mut self.show_assignees,
        };
        *slot = value;
    }
}
