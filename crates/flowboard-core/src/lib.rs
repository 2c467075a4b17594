//! flowboard-core: Core library for the flowboard kanban board
//!
//! Provides the board model, the pure board operations, an observable
//! in-memory store, filtering, and the drag-and-drop interpreter shared by
//! the TUI and CLI front ends. Nothing is persisted except configuration.

pub mod board;
pub mod column;
pub mod command;
pub mod config;
pub mod drag;
pub mod error;
pub mod filter;
pub mod id;
pub mod modal;
pub mod seed;
pub mod store;
pub mod task;
pub mod user;
pub mod users;
pub mod validation;
pub mod workspace;

pub use board::{Board, array_move};
pub use column::{Column, ColumnPatch};
pub use command::Command;
pub use config::{Config, DisplayConfig, ViewConfig};
pub use drag::{ActiveItem, DragController, DragEffect, DragId};
pub use error::Error;
pub use filter::{FilterState, ViewOption, ViewOptions};
pub use id::IdGenerator;
pub use modal::{
    ColumnModal, ColumnModalKind, DrawerKind, MembersDrawer, Modal, TaskContext, TaskModal,
    TaskModalKind, UserModal, UserModalKind,
};
pub use store::{BoardStore, Change, SubscriberId};
pub use task::{Priority, SortDirection, Task, TaskPatch};
pub use user::User;
pub use users::UserStore;
pub use validation::TaskDraft;
pub use workspace::Workspace;

/// Result type for flowboard operations
pub type Result<T> = std::result::Result<T, Error>;
