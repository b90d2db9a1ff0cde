//! Dioxus integration for the to-do list.
//!
//! Provides a turnkey setup for the desktop app:
//!
//! - [`launch()`] — creates a tokio runtime, builds [`TodoDb`](todolist::TodoDb)
//!   (which creates the schema) and launches Dioxus desktop with the DB and a
//!   [`SessionStore`](todolist::SessionStore) available via context.
//! - [`use_db()`] — retrieves the `&'static TodoDb` from Dioxus context.
//! - [`use_page`] — opens a session for the calling component and returns the
//!   current [`Page`](todolist::Page) plus a callback that applies an
//!   [`Action`](todolist::Action) and swaps in the refreshed page.
//!
//! ## Example
//!
//! ```ignore
//! fn main() -> Result<(), todolist_dioxus::LaunchError> {
//!     todolist_dioxus::launch(todolist::DEFAULT_DATABASE_URL, App)
//! }
//!
//! fn App() -> Element {
//!     let (page, dispatch) = todolist_dioxus::use_page();
//!     // ... render *page.read(), call dispatch.call(action) on input
//!     todo!()
//! }
//! ```

pub mod hooks;
pub mod launch;

pub use hooks::*;
pub use launch::{launch, use_db, use_sessions, LaunchError};
