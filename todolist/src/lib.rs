//! # todolist
//!
//! Storage, authentication and task services for a single-page to-do list
//! with username/password login.
//!
//! Everything sits on a SeaORM [`DatabaseConnection`](sea_orm::DatabaseConnection)
//! wrapped by [`TodoDb`]. Two tables are created on connect: `users` and `tasks`.
//! The [`page`] module ties the services together into a small state machine
//! that a UI layer drives one [`Action`] at a time, receiving a freshly
//! rendered [`Page`] back after every interaction.
//!
//! ## Quick start
//!
//! ```ignore
//! use todolist::{auth, tasks, Priority, TodoDbBuilder};
//!
//! let db = TodoDbBuilder::new("sqlite:./todo_app.db?mode=rwc").build().await?;
//!
//! auth::register(&db, "alice", "pw1").await?;
//! let user = auth::authenticate(&db, "alice", "pw1").await?;
//! assert!(user.is_some());
//!
//! let id = tasks::add(&db, "alice", "Buy milk", Priority::Low, due).await?;
//! tasks::toggle(&db, id, true).await?;
//! ```
//!
//! ## Key types
//!
//! - [`TodoDb`] — connection wrapper that owns the schema
//! - [`TodoDbBuilder`] — connects and ensures both tables exist
//! - [`Session`] / [`SessionStore`] — per-client login state keyed by [`SessionId`]
//! - [`Page`] / [`Action`] — what the UI renders and what it sends back

pub mod auth;
pub mod connection;
pub mod entity;
pub mod page;
pub mod session;
pub mod tasks;

pub use auth::AuthError;
pub use connection::{TodoDb, TodoDbBuilder};
pub use entity::task::{ParsePriorityError, Priority, TaskId};
pub use entity::{task, user};
pub use page::{Action, AuthMenu, Notice, Page};
pub use session::{PutError, Session, SessionId, SessionState, SessionStore};

// Re-export sea-orm for users of the library
pub use sea_orm;

/// Database used by the desktop app: a file next to the working directory,
/// created on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./todo_app.db?mode=rwc";
