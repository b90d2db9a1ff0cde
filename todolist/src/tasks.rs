//! Task CRUD against the `tasks` table.
//!
//! None of these check ownership: `toggle` and `delete` act on any id they
//! are given, whoever the caller is logged in as.

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entity::task::{self, Priority, TaskId};

/// Insert a new, not yet completed task and return its id.
///
/// Neither the description nor the due date is validated.
pub async fn add(
    db: &impl ConnectionTrait,
    username: &str,
    description: &str,
    priority: Priority,
    due_date: chrono::NaiveDate,
) -> Result<TaskId, DbErr> {
    let new_task = task::ActiveModel {
        username: Set(username.to_string()),
        description: Set(description.to_string()),
        priority: Set(priority),
        due_date: Set(due_date),
        completed: Set(false),
        ..Default::default()
    };
    let inserted = new_task.insert(db).await?;
    log::debug!("task {} added for {username}", inserted.id);
    Ok(inserted.id)
}

/// Every task of `username`, in insertion order.
pub async fn list(db: &impl ConnectionTrait, username: &str) -> Result<Vec<task::Model>, DbErr> {
    task::Entity::find()
        .filter(task::Column::Username.eq(username))
        .order_by_asc(task::Column::Id)
        .all(db)
        .await
}

/// Set the completed flag of a task. Unknown ids are silently ignored.
pub async fn toggle(db: &impl ConnectionTrait, id: TaskId, completed: bool) -> Result<(), DbErr> {
    let result = task::Entity::update_many()
        .col_expr(task::Column::Completed, Expr::value(completed))
        .filter(task::Column::Id.eq(id))
        .exec(db)
        .await?;
    log::debug!(
        "task {id} completed={completed} ({} row(s) updated)",
        result.rows_affected
    );
    Ok(())
}

/// Remove a task. Deleting an id that does not exist is a no-op.
pub async fn delete(db: &impl ConnectionTrait, id: TaskId) -> Result<(), DbErr> {
    let result = task::Entity::delete_by_id(id).exec(db).await?;
    log::debug!("task {id} deleted ({} row(s))", result.rows_affected);
    Ok(())
}
