//! Error types for flowboard

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Task not found: {task_id} in column {column_id}")]
    TaskNotFound { task_id: String, column_id: String },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Confirmation does not match \"{0}\"")]
    ConfirmationMismatch(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid drag identifier: {0}")]
    InvalidDragId(String),

    #[error("Invalid view option: {0}")]
    InvalidViewOption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn task_not_found(task_id: &str, column_id: &str) -> Self {
        Error::TaskNotFound {
            task_id: task_id.to_string(),
            column_id: column_id.to_string(),
        }
    }

    /// True for the "operated on a missing id/index" family.
    ///
    /// Presentation code treats these as silent no-ops.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ColumnNotFound(_)
                | Error::TaskNotFound { .. }
                | Error::UserNotFound(_)
                | Error::IndexOutOfRange { .. }
        )
    }
}
