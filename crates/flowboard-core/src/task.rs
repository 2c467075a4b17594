//! Task data model for flowboard

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort key under `direction`; smaller ranks come first.
    pub fn rank(self, direction: SortDirection) -> u8 {
        match (direction, self) {
            (SortDirection::HighToLow, Priority::High) => 1,
            (SortDirection::HighToLow, Priority::Medium) => 2,
            (SortDirection::HighToLow, Priority::Low) => 3,
            (SortDirection::LowToHigh, Priority::Low) => 1,
            (SortDirection::LowToHigh, Priority::Medium) => 2,
            (SortDirection::LowToHigh, Priority::High) => 3,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(crate::Error::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Per-column priority sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    #[default]
    HighToLow,
    LowToHigh,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::HighToLow => SortDirection::LowToHigh,
            SortDirection::LowToHigh => SortDirection::HighToLow,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::HighToLow => write!(f, "high-to-low"),
            SortDirection::LowToHigh => write!(f, "low-to-high"),
        }
    }
}

/// A card on the board
///
/// Archive state is a single optional timestamp, so "archived" and
/// "has an archive time" cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique across the whole board
    pub id: String,

    pub title: String,

    pub description: String,

    pub priority: Priority,

    /// User id, None = unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// When the task was archived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            priority,
            assignee_id: None,
            due_date: None,
            archived_at: None,
        }
    }

    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assignee_id = Some(user_id.into());
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn archive(&mut self, at: DateTime<Utc>) {
        self.archived_at = Some(at);
    }

    pub fn unarchive(&mut self) {
        self.archived_at = None;
    }

    pub fn is_unassigned(&self) -> bool {
        self.assignee_id.is_none()
    }

    /// Due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
    }

    /// Case-insensitive substring match on title or description.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(ref assignee) = patch.assignee_id {
            self.assignee_id = assignee.clone();
        }
        if let Some(due) = patch.due_date {
            self.due_date = due;
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.id, self.priority, self.title)?;
        if self.is_archived() {
            write!(f, " (archived)")?;
        }
        Ok(())
    }
}

/// Partial update for a task
///
/// `assignee_id` and `due_date` are doubly optional: `None` leaves the field
/// alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &TaskPatch::default()
    }
}

/// Present-but-null deserializes to `Some(None)`; absent stays `None` via `default`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank() {
        assert!(
            Priority::High.rank(SortDirection::HighToLow)
                < Priority::Medium.rank(SortDirection::HighToLow)
        );
        assert!(
            Priority::Low.rank(SortDirection::LowToHigh)
                < Priority::Medium.rank(SortDirection::LowToHigh)
        );
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_archive_roundtrip() {
        let mut task = Task::new("1", "Title", "Desc", Priority::Low);
        assert!(!task.is_archived());
        task.archive(Utc::now());
        assert!(task.is_archived());
        task.unarchive();
        assert!(task.archived_at.is_none());
    }

    #[test]
    fn test_patch_clears_assignee() {
        let mut task = Task::new("1", "Title", "Desc", Priority::Low).with_assignee("u1");
        let patch: TaskPatch = serde_json::from_str(r#"{"assignee_id": null}"#).unwrap();
        assert_eq!(patch.assignee_id, Some(None));
        task.apply(&patch);
        assert!(task.is_unassigned());

        let untouched: TaskPatch = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert_eq!(untouched.assignee_id, None);
    }

    #[test]
    fn test_matches_text() {
        let task = Task::new("1", "Write Docs", "API endpoints", Priority::Low);
        assert!(task.matches_text("docs"));
        assert!(task.matches_text("endpoint"));
        assert!(!task.matches_text("login"));
        assert!(task.matches_text(""));
    }

    #[test]
    fn test_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        let task = Task::new("1", "T", "D", Priority::Low)
            .with_due_date(NaiveDate::from_ymd_opt(2025, 4, 19).unwrap());
        assert!(task.is_overdue(today));
        assert!(!Task::new("2", "T", "D", Priority::Low).is_overdue(today));
    }
}
