mod common;

use common::{date, memory_db};
use sea_orm::ConnectionTrait;
use todolist::page::{self, Action};
use todolist::{
    auth, tasks, AuthMenu, Notice, Page, Priority, PutError, Session, SessionState, SessionStore,
};

fn login(username: &str, password: &str) -> Action {
    Action::Login {
        username: username.into(),
        password: password.into(),
    }
}

fn add(description: &str) -> Action {
    Action::AddTask {
        description: description.into(),
        priority: Priority::Medium,
        due_date: date(2024, 3, 1),
    }
}

#[tokio::test]
async fn test_new_session_renders_login_form() {
    let db = memory_db().await;
    let session = Session::new();

    let page = page::render(&db, &session).await.unwrap();
    assert_eq!(page, Page::login());
}

#[tokio::test]
async fn test_register_flow_messages() {
    let db = memory_db().await;
    let mut session = Session::new();

    let page = page::dispatch(&db, &mut session, Action::ShowMenu(AuthMenu::Register))
        .await
        .unwrap();
    assert_eq!(
        page,
        Page::Auth {
            menu: AuthMenu::Register,
            notice: None
        }
    );

    let register = |password: &str, confirm: &str| Action::Register {
        username: "alice".into(),
        password: password.into(),
        confirm: confirm.into(),
    };

    let page = page::dispatch(&db, &mut session, register("pw1", "pw9"))
        .await
        .unwrap();
    assert_eq!(page.notice(), Some(&Notice::error("Passwords do not match")));

    let page = page::dispatch(&db, &mut session, register("pw1", "pw1"))
        .await
        .unwrap();
    assert_eq!(
        page.notice(),
        Some(&Notice::success("User registered successfully"))
    );

    let page = page::dispatch(&db, &mut session, register("pw2", "pw2"))
        .await
        .unwrap();
    assert_eq!(page.notice(), Some(&Notice::error("Username already exists")));

    // Registering never logs anyone in
    assert_eq!(session.state, SessionState::LoggedOut);
}

#[tokio::test]
async fn test_login_failure_is_generic() {
    let db = memory_db().await;
    auth::register(&db, "alice", "pw1").await.unwrap();
    let mut session = Session::new();

    for action in [login("alice", "wrong"), login("mallory", "pw1")] {
        let page = page::dispatch(&db, &mut session, action).await.unwrap();
        assert_eq!(
            page,
            Page::Auth {
                menu: AuthMenu::Login,
                notice: Some(Notice::error("Invalid username or password")),
            }
        );
        assert!(!session.is_logged_in());
    }
}

#[tokio::test]
async fn test_login_add_toggle_delete_logout() {
    let db = memory_db().await;
    auth::register(&db, "alice", "pw1").await.unwrap();
    let mut session = Session::new();

    let page = page::dispatch(&db, &mut session, login("alice", "pw1"))
        .await
        .unwrap();
    assert_eq!(
        page,
        Page::Tasks {
            username: "alice".into(),
            tasks: vec![],
            notice: Some(Notice::success("Welcome alice")),
        }
    );
    assert_eq!(session.username(), Some("alice"));

    // Every mutation hands back a page re-read from storage
    let page = page::dispatch(&db, &mut session, add("Buy milk")).await.unwrap();
    assert_eq!(page.tasks().len(), 1);
    let id = page.tasks()[0].id;
    assert_eq!(page.tasks()[0].description, "Buy milk");
    assert!(page.notice().is_none());

    let page = page::dispatch(&db, &mut session, Action::Toggle { id, completed: true })
        .await
        .unwrap();
    assert!(page.tasks()[0].completed);

    let page = page::dispatch(&db, &mut session, Action::Delete { id })
        .await
        .unwrap();
    assert!(page.tasks().is_empty());

    let page = page::dispatch(&db, &mut session, Action::Logout).await.unwrap();
    assert_eq!(page, Page::login());
    assert_eq!(session.state, SessionState::LoggedOut);
    assert_eq!(session.username(), None);
}

#[tokio::test]
async fn test_mutations_ignored_while_logged_out() {
    let db = memory_db().await;
    let kept = tasks::add(&db, "alice", "Keep me", Priority::Low, date(2024, 1, 1))
        .await
        .unwrap();
    let mut session = Session::new();

    for action in [
        add("Sneaky"),
        Action::Toggle {
            id: kept,
            completed: true,
        },
        Action::Delete { id: kept },
        Action::Logout,
    ] {
        let page = page::dispatch(&db, &mut session, action).await.unwrap();
        assert_eq!(page, Page::login());
    }

    let listed = tasks::list(&db, "alice").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].completed);
    assert!(tasks::list(&db, "").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sessions_see_only_their_own_tasks() {
    let db = memory_db().await;
    auth::register(&db, "alice", "pw1").await.unwrap();
    auth::register(&db, "bob", "pw2").await.unwrap();

    let mut alice = Session::new();
    let mut bob = Session::new();
    page::dispatch(&db, &mut alice, login("alice", "pw1")).await.unwrap();
    page::dispatch(&db, &mut bob, login("bob", "pw2")).await.unwrap();

    page::dispatch(&db, &mut alice, add("Alice's")).await.unwrap();
    let page = page::dispatch(&db, &mut bob, add("Bob's")).await.unwrap();
    assert_eq!(page.tasks().len(), 1);
    assert_eq!(page.tasks()[0].description, "Bob's");

    let page = page::dispatch(&db, &mut alice, Action::Refresh).await.unwrap();
    assert_eq!(page.tasks().len(), 1);
    assert_eq!(page.tasks()[0].username, "alice");

    page::dispatch(&db, &mut alice, Action::Logout).await.unwrap();
    assert_eq!(bob.username(), Some("bob"));
}

#[tokio::test]
async fn test_stale_interaction_cannot_undo_logout() {
    let db = memory_db().await;
    auth::register(&db, "alice", "pw1").await.unwrap();
    let sessions = SessionStore::new();
    let id = sessions.open();

    page::handle(&db, &sessions, id, login("alice", "pw1"))
        .await
        .unwrap()
        .expect("login page");

    // An add still in flight holds a logged-in copy while logout completes
    let mut in_flight = sessions.get(id).unwrap();
    let page = page::handle(&db, &sessions, id, Action::Logout)
        .await
        .unwrap();
    assert_eq!(page, Some(Page::login()));

    let stale_page = page::dispatch(&db, &mut in_flight, add("Late"))
        .await
        .unwrap();
    assert_eq!(stale_page.tasks().len(), 1);
    assert_eq!(sessions.put(in_flight), Err(PutError::Stale(id)));

    let session = sessions.get(id).unwrap();
    assert_eq!(session.state, SessionState::LoggedOut);
    assert_eq!(session.username(), None);
}

#[tokio::test]
async fn test_handle_drops_interactions_for_closed_sessions() {
    let db = memory_db().await;
    let sessions = SessionStore::new();
    let id = sessions.open();
    sessions.close(id);

    let page = page::handle(&db, &sessions, id, Action::Refresh)
        .await
        .unwrap();
    assert_eq!(page, None);
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_storage_errors_abort_task_interactions() {
    let db = memory_db().await;
    auth::register(&db, "alice", "pw1").await.unwrap();
    let sessions = SessionStore::new();
    let id = sessions.open();
    page::handle(&db, &sessions, id, login("alice", "pw1"))
        .await
        .unwrap();
    let before = sessions.get(id).unwrap();

    db.execute_unprepared("DROP TABLE tasks")
        .await
        .expect("drop tasks");

    for action in [
        add("Buy milk"),
        Action::Toggle {
            id: 1,
            completed: true,
        },
        Action::Delete { id: 1 },
        Action::Refresh,
    ] {
        let result = page::handle(&db, &sessions, id, action).await;
        assert!(result.is_err(), "storage failure must surface as Err");
    }

    // Nothing was written back
    assert_eq!(sessions.get(id).unwrap(), before);
    assert_eq!(before.username(), Some("alice"));
}

#[tokio::test]
async fn test_storage_errors_abort_auth_interactions() {
    let db = memory_db().await;
    let sessions = SessionStore::new();
    let id = sessions.open();

    db.execute_unprepared("DROP TABLE users")
        .await
        .expect("drop users");

    let register = Action::Register {
        username: "alice".into(),
        password: "pw1".into(),
        confirm: "pw1".into(),
    };
    assert!(page::handle(&db, &sessions, id, register).await.is_err());
    assert!(
        page::handle(&db, &sessions, id, login("alice", "pw1"))
            .await
            .is_err()
    );

    // A mismatch is caught before storage and still reported as a notice
    let mismatch = Action::Register {
        username: "alice".into(),
        password: "pw1".into(),
        confirm: "pw2".into(),
    };
    let page = page::handle(&db, &sessions, id, mismatch)
        .await
        .unwrap()
        .expect("session still open");
    assert_eq!(page.notice(), Some(&Notice::error("Passwords do not match")));

    assert_eq!(sessions.get(id).unwrap().state, SessionState::LoggedOut);
}
