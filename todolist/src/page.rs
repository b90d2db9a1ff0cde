//! The single page as a state machine.
//!
//! The UI sends one [`Action`] per interaction to [`dispatch`], together with
//! the client's [`Session`]. The handler performs the storage calls, updates
//! the session and returns a [`Page`] re-read from storage, so the view after
//! a mutation always reflects what is actually persisted.
//!
//! ```text
//!   LoggedOut --Login ok--> LoggedIn
//!   LoggedIn  --Logout----> LoggedOut
//! ```
//!
//! Task mutations are only honoured while logged in. Storage errors other
//! than a duplicate username are returned as `Err` and abort the interaction.

use sea_orm::{ConnectionTrait, DbErr};

use crate::auth::{self, AuthError};
use crate::entity::task::{self, Priority, TaskId};
use crate::session::{Session, SessionId, SessionStore};
use crate::tasks;

/// Which form the logged-out page shows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthMenu {
    #[default]
    Login,
    Register,
}

impl AuthMenu {
    pub const ALL: [AuthMenu; 2] = [AuthMenu::Login, AuthMenu::Register];

    pub fn label(self) -> &'static str {
        match self {
            AuthMenu::Login => "Login",
            AuthMenu::Register => "Register",
        }
    }
}

/// One-shot message shown above the page content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Everything needed to draw the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    /// Logged out: login or registration form.
    Auth {
        menu: AuthMenu,
        notice: Option<Notice>,
    },
    /// Logged in: the user's tasks in storage order.
    Tasks {
        username: String,
        tasks: Vec<task::Model>,
        notice: Option<Notice>,
    },
}

impl Page {
    /// The page a brand new session starts on.
    pub fn login() -> Self {
        Page::Auth {
            menu: AuthMenu::Login,
            notice: None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Page::Auth { notice, .. } | Page::Tasks { notice, .. } => notice.as_ref(),
        }
    }

    /// Tasks on display; empty on the auth page.
    pub fn tasks(&self) -> &[task::Model] {
        match self {
            Page::Tasks { tasks, .. } => tasks,
            Page::Auth { .. } => &[],
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::login()
    }
}

/// A user interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ShowMenu(AuthMenu),
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
        confirm: String,
    },
    Logout,
    AddTask {
        description: String,
        priority: Priority,
        due_date: chrono::NaiveDate,
    },
    Toggle {
        id: TaskId,
        completed: bool,
    },
    Delete {
        id: TaskId,
    },
    /// Re-render from storage without changing anything.
    Refresh,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::ShowMenu(_) => "show-menu",
            Action::Login { .. } => "login",
            Action::Register { .. } => "register",
            Action::Logout => "logout",
            Action::AddTask { .. } => "add-task",
            Action::Toggle { .. } => "toggle",
            Action::Delete { .. } => "delete",
            Action::Refresh => "refresh",
        }
    }
}

/// Draw the page for the session as it currently stands.
pub async fn render(db: &impl ConnectionTrait, session: &Session) -> Result<Page, DbErr> {
    render_with(db, session, None).await
}

/// Apply one interaction and return the refreshed page.
pub async fn dispatch(
    db: &impl ConnectionTrait,
    session: &mut Session,
    action: Action,
) -> Result<Page, DbErr> {
    log::debug!("session {}: {}", session.id, action.name());
    match session.username().map(str::to_owned) {
        Some(username) => dispatch_logged_in(db, session, username, action).await,
        None => dispatch_logged_out(db, session, action).await,
    }
}

/// Apply one interaction to a session held in `sessions`.
///
/// Works on a copy of the session and writes it back only after the
/// interaction succeeded. Returns `Ok(None)` when the session is closed or
/// was changed by another interaction in the meantime; the page computed
/// from the outdated copy is dropped in that case.
pub async fn handle(
    db: &impl ConnectionTrait,
    sessions: &SessionStore,
    id: SessionId,
    action: Action,
) -> Result<Option<Page>, DbErr> {
    let Some(mut session) = sessions.get(id) else {
        log::error!("session {id} is gone, dropping interaction");
        return Ok(None);
    };
    let page = dispatch(db, &mut session, action).await?;
    match sessions.put(session) {
        Ok(()) => Ok(Some(page)),
        Err(err) => {
            log::warn!("{err}");
            Ok(None)
        }
    }
}

async fn dispatch_logged_out(
    db: &impl ConnectionTrait,
    session: &mut Session,
    action: Action,
) -> Result<Page, DbErr> {
    match action {
        Action::ShowMenu(menu) => Ok(Page::Auth { menu, notice: None }),
        Action::Login { username, password } => {
            match auth::authenticate(db, &username, &password).await? {
                Some(user) => {
                    session.login(&user.username);
                    let welcome = Notice::success(format!("Welcome {}", user.username));
                    render_with(db, session, Some(welcome)).await
                }
                None => Ok(Page::Auth {
                    menu: AuthMenu::Login,
                    notice: Some(Notice::error("Invalid username or password")),
                }),
            }
        }
        Action::Register {
            username,
            password,
            confirm,
        } => {
            let notice =
                match auth::register_confirmed(db, &username, &password, &confirm).await {
                    Ok(()) => Notice::success("User registered successfully"),
                    Err(AuthError::Storage(err)) => return Err(err),
                    Err(err) => Notice::error(err.to_string()),
                };
            Ok(Page::Auth {
                menu: AuthMenu::Register,
                notice: Some(notice),
            })
        }
        Action::Refresh => render(db, session).await,
        other => {
            log::warn!(
                "session {}: {} ignored while logged out",
                session.id,
                other.name()
            );
            render(db, session).await
        }
    }
}

async fn dispatch_logged_in(
    db: &impl ConnectionTrait,
    session: &mut Session,
    username: String,
    action: Action,
) -> Result<Page, DbErr> {
    match action {
        Action::Logout => {
            session.logout();
            Ok(Page::login())
        }
        Action::AddTask {
            description,
            priority,
            due_date,
        } => {
            tasks::add(db, &username, &description, priority, due_date).await?;
            render(db, session).await
        }
        Action::Toggle { id, completed } => {
            tasks::toggle(db, id, completed).await?;
            render(db, session).await
        }
        Action::Delete { id } => {
            tasks::delete(db, id).await?;
            render(db, session).await
        }
        Action::Refresh => render(db, session).await,
        other => {
            log::warn!(
                "session {}: {} ignored while logged in as {username}",
                session.id,
                other.name()
            );
            render(db, session).await
        }
    }
}

async fn render_with(
    db: &impl ConnectionTrait,
    session: &Session,
    notice: Option<Notice>,
) -> Result<Page, DbErr> {
    match session.username() {
        Some(username) => Ok(Page::Tasks {
            username: username.to_string(),
            tasks: tasks::list(db, username).await?,
            notice,
        }),
        None => Ok(Page::Auth {
            menu: AuthMenu::Login,
            notice,
        }),
    }
}
