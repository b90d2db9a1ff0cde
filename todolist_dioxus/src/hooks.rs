//! Reactive Dioxus hooks for the page state machine.
//!
//! The page is never refreshed implicitly: every [`Action`] goes through
//! [`todolist::page::handle`], and the page it returns (re-read from
//! storage) replaces the signal's value.

use dioxus::prelude::*;
use futures::StreamExt;
use todolist::{page, Action, Page, SessionId};

use crate::launch::{use_db, use_sessions};

/// Current page of a client session plus the callback that drives it.
///
/// Opens a new logged-out session in the shared
/// [`SessionStore`](todolist::SessionStore) the first time the calling
/// component renders, and closes it when the component is dropped.
///
/// Actions sent through the returned [`Callback`] are queued and applied one
/// at a time, in click order, by a single coroutine. On success the session
/// is written back and the signal re-renders; a storage error is logged and
/// the interaction is abandoned, leaving both untouched.
pub fn use_page() -> (Signal<Page>, Callback<Action>) {
    let db = use_db();
    let sessions = use_sessions();
    let session_id: SessionId = use_hook(|| sessions.open());
    let mut page = use_signal(Page::login);

    use_drop(move || {
        sessions.close(session_id);
    });

    let interactions = use_coroutine(move |mut rx: UnboundedReceiver<Action>| async move {
        while let Some(action) = rx.next().await {
            match page::handle(db, sessions, session_id, action).await {
                Ok(Some(next)) => page.set(next),
                Ok(None) => {}
                Err(e) => log::error!("session {session_id}: interaction aborted: {e}"),
            }
        }
    });

    let dispatch = use_callback(move |action: Action| interactions.send(action));

    (page, dispatch)
}
