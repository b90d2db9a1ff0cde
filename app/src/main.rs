use chrono::{Local, NaiveDate};
use todolist::{task, Action, AuthMenu, Notice, Page, Priority};
use todolist_dioxus::{use_page, LaunchError};

use dioxus::prelude::*;

const STYLE: &str = r#"
    body { font-family: sans-serif; max-width: 760px; margin: 40px auto; padding: 0 20px; }
    h1 { text-align: center; color: #FF5733; }
    .layout { display: flex; gap: 24px; }
    .sidebar { width: 160px; display: flex; flex-direction: column; gap: 6px; }
    .content { flex: 1; }
    .form { display: flex; flex-direction: column; gap: 8px; margin-bottom: 20px; }
    .form input, .form select { padding: 8px; font-size: 14px; border: 1px solid #ccc; border-radius: 4px; }
    .form button, .logout { padding: 8px 16px; background: #4a90d9; color: white; border: none; border-radius: 4px; cursor: pointer; }
    .notice { padding: 8px 12px; border-radius: 4px; margin-bottom: 12px; }
    .notice.success { background: #e6f4ea; color: #1e7e34; }
    .notice.error { background: #fdecea; color: #b00020; }
    .task-list { list-style: none; padding: 0; }
    .task-item { display: grid; grid-template-columns: 1fr 8fr 4fr 3fr 3fr; align-items: center; gap: 8px; padding: 8px 0; border-bottom: 1px solid #eee; }
    .task-item .completed { text-decoration: line-through; color: #999; }
    .task-item button { background: #e74c3c; color: white; border: none; border-radius: 4px; padding: 4px 10px; cursor: pointer; }
    .empty { color: #999; font-style: italic; }
"#;

fn main() -> Result<(), LaunchError> {
    env_logger::init();
    todolist_dioxus::launch(todolist::DEFAULT_DATABASE_URL, App)
}

#[allow(non_snake_case)]
fn App() -> Element {
    let (page, dispatch) = use_page();

    let body = match page.read().clone() {
        Page::Auth { menu, notice } => rsx! {
            AuthView { menu, notice, dispatch }
        },
        Page::Tasks {
            username,
            tasks,
            notice,
        } => rsx! {
            TasksView { username, tasks, notice, dispatch }
        },
    };

    rsx! {
        style { {STYLE} }
        {body}
    }
}

#[component]
fn NoticeBanner(notice: Notice) -> Element {
    rsx! {
        div {
            class: if notice.is_error() { "notice error" } else { "notice success" },
            "{notice.message()}"
        }
    }
}

#[component]
fn AuthView(
    menu: AuthMenu,
    #[props(!optional)] notice: Option<Notice>,
    dispatch: Callback<Action>,
) -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);

    let submit = move |_| {
        let action = match menu {
            AuthMenu::Login => Action::Login {
                username: username(),
                password: password(),
            },
            AuthMenu::Register => Action::Register {
                username: username(),
                password: password(),
                confirm: confirm(),
            },
        };
        dispatch.call(action);
    };

    let pick_menu = move |evt: FormEvent| {
        let picked = if evt.value() == AuthMenu::Register.label() {
            AuthMenu::Register
        } else {
            AuthMenu::Login
        };
        dispatch.call(Action::ShowMenu(picked));
    };

    let (user_label, pass_label) = match menu {
        AuthMenu::Login => ("Username", "Password"),
        AuthMenu::Register => ("New Username", "New Password"),
    };

    rsx! {
        h1 { "To-Do List with Login" }
        div { class: "layout",
            aside { class: "sidebar",
                label { "Menu" }
                select { onchange: pick_menu,
                    for m in AuthMenu::ALL {
                        option { value: m.label(), selected: m == menu, "{m.label()}" }
                    }
                }
            }
            section { class: "content",
                h2 { "{menu.label()}" }
                if let Some(notice) = notice {
                    NoticeBanner { notice }
                }
                div { class: "form",
                    input {
                        r#type: "text",
                        placeholder: user_label,
                        value: "{username}",
                        oninput: move |evt| username.set(evt.value()),
                    }
                    input {
                        r#type: "password",
                        placeholder: pass_label,
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                    if menu == AuthMenu::Register {
                        input {
                            r#type: "password",
                            placeholder: "Confirm Password",
                            value: "{confirm}",
                            oninput: move |evt| confirm.set(evt.value()),
                        }
                    }
                    button { onclick: submit, "{menu.label()}" }
                }
            }
        }
    }
}

#[component]
fn TasksView(
    username: String,
    tasks: Vec<task::Model>,
    #[props(!optional)] notice: Option<Notice>,
    dispatch: Callback<Action>,
) -> Element {
    rsx! {
        h1 { "Welcome, {username}" }
        if let Some(notice) = notice {
            NoticeBanner { notice }
        }
        AddTaskForm { dispatch }
        h3 { "Your tasks:" }
        ul { class: "task-list",
            if tasks.is_empty() {
                li { class: "empty", "No tasks yet. Add one above!" }
            }
            for t in tasks.iter() {
                TaskRow { key: "{t.id}", task: t.clone(), dispatch }
            }
        }
        button { class: "logout", onclick: move |_| dispatch.call(Action::Logout), "Logout" }
    }
}

#[component]
fn AddTaskForm(dispatch: Callback<Action>) -> Element {
    let mut description = use_signal(String::new);
    let mut priority = use_signal(Priority::default);
    let mut due = use_signal(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

    let add = move |_| {
        let raw_due = due();
        let due_date = match NaiveDate::parse_from_str(&raw_due, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                log::warn!("ignoring add, bad due date {raw_due:?}: {e}");
                return;
            }
        };
        dispatch.call(Action::AddTask {
            description: description(),
            priority: priority(),
            due_date,
        });
        description.set(String::new());
    };

    rsx! {
        div { class: "form",
            input {
                r#type: "text",
                placeholder: "Enter a new task:",
                value: "{description}",
                oninput: move |evt| description.set(evt.value()),
            }
            label { "Priority Level:" }
            select {
                onchange: move |evt: FormEvent| match evt.value().parse::<Priority>() {
                    Ok(p) => priority.set(p),
                    Err(e) => log::warn!("{e}"),
                },
                for p in Priority::ALL {
                    option { value: p.as_str(), selected: p == priority(), "{p}" }
                }
            }
            label { "Due Date:" }
            input {
                r#type: "date",
                value: "{due}",
                oninput: move |evt| due.set(evt.value()),
            }
            button { onclick: add, "Add Task" }
        }
    }
}

#[component]
fn TaskRow(task: task::Model, dispatch: Callback<Action>) -> Element {
    let id = task.id;
    let completed = task.completed;

    rsx! {
        li { class: "task-item",
            input {
                r#type: "checkbox",
                checked: completed,
                onchange: move |_| dispatch.call(Action::Toggle { id, completed: !completed }),
            }
            span {
                class: if completed { "completed" } else { "" },
                "{task.description}"
            }
            span { "{task.priority}" }
            span { "{task.due_date}" }
            button { onclick: move |_| dispatch.call(Action::Delete { id }), "Delete" }
        }
    }
}
