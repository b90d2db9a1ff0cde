use dioxus::prelude::*;
use sea_orm::DbErr;
use thiserror::Error;
use todolist::{SessionStore, TodoDb, TodoDbBuilder};

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to create tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Failed to open database: {0}")]
    Database(#[from] DbErr),

    #[error("App already launched")]
    AlreadyLaunched,
}

/// Launch a Dioxus desktop app with the to-do database fully wired up.
///
/// This handles all the boilerplate:
/// - Creates a multi-threaded tokio runtime and enters it
/// - Builds [`TodoDb`] via [`TodoDbBuilder`], creating both tables if needed
/// - Leaks the DB and a fresh [`SessionStore`] to get `&'static` references
/// - Provides them via Dioxus context so components can call [`use_db()`]
///   and [`use_page()`](crate::use_page)
/// - Launches Dioxus desktop
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), todolist_dioxus::LaunchError> {
///     todolist_dioxus::launch("sqlite::memory:", App)
/// }
///
/// fn App() -> dioxus::prelude::Element {
///     let (page, dispatch) = todolist_dioxus::use_page();
///     // ... render the page
///     todo!()
/// }
/// ```
pub fn launch(url: &str, app: fn() -> Element) -> Result<(), LaunchError> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let _guard = rt.enter();

    let db = rt.block_on(TodoDbBuilder::new(url).build())?;
    let db: &'static TodoDb = Box::leak(Box::new(db));
    let sessions: &'static SessionStore = Box::leak(Box::new(SessionStore::new()));

    // Store the user's component and the shared state, then launch with our wrapper
    if CONTEXT.set(AppContext { db, sessions }).is_err() || USER_APP.set(app).is_err() {
        return Err(LaunchError::AlreadyLaunched);
    }

    log::info!("launching desktop app");
    dioxus::launch(RootWrapper);
    // Only reached once the desktop event loop exits, which it normally does by ending the process
    Ok(())
}

/// Convenience hook — retrieves the `&'static TodoDb` from Dioxus context.
///
/// Must be called inside a component rendered under [`launch`].
pub fn use_db() -> &'static TodoDb {
    use_context::<AppContext>().db
}

/// Retrieves the `&'static SessionStore` shared by every page in the app.
pub fn use_sessions() -> &'static SessionStore {
    use_context::<AppContext>().sessions
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext {
    pub(crate) db: &'static TodoDb,
    pub(crate) sessions: &'static SessionStore,
}

// Internal statics used to pass data from `launch()` into the Dioxus component tree.
static CONTEXT: std::sync::OnceLock<AppContext> = std::sync::OnceLock::new();
static USER_APP: std::sync::OnceLock<fn() -> Element> = std::sync::OnceLock::new();

/// Internal root component that provides the context then renders the user's app.
#[component]
fn RootWrapper() -> Element {
    let Some(context) = CONTEXT.get().copied() else {
        return rsx! { "Not launched through todolist_dioxus::launch" };
    };
    use_context_provider(|| context);

    match USER_APP.get() {
        Some(app) => app(),
        None => rsx! { "Not launched through todolist_dioxus::launch" },
    }
}
