use sea_orm::{
    sea_query::SqliteQueryBuilder, ConnectOptions, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection, DbErr, EntityTrait, ExecResult, QueryResult, Schema, Statement,
};

use crate::entity::{task, user};

/// A SeaORM connection wrapper that owns the to-do schema.
///
/// Every statement is forwarded to the inner connection unchanged and traced
/// at `trace` level, so `RUST_LOG=todolist=trace` shows the exact SQL issued
/// by each interaction.
#[derive(Debug, Clone)]
pub struct TodoDb {
    inner: DatabaseConnection,
}

impl TodoDb {
    /// Wrap an already-open connection. The schema is not touched; call
    /// [`ensure_schema`](TodoDb::ensure_schema) before issuing queries.
    pub fn from_connection(inner: DatabaseConnection) -> Self {
        Self { inner }
    }

    /// Create the `users` and `tasks` tables if they do not exist yet.
    ///
    /// Idempotent; existing rows are left alone and no migration is attempted.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        self.ensure_table(user::Entity).await?;
        self.ensure_table(task::Entity).await?;
        Ok(())
    }

    /// Create the table for a single entity (if not exists), using SeaORM entity metadata.
    pub async fn ensure_table<E>(&self, entity: E) -> Result<(), DbErr>
    where
        E: EntityTrait,
    {
        log::debug!("ensuring table {}", entity.table_name());
        let schema = Schema::new(self.get_database_backend());
        let create_sql = schema
            .create_table_from_entity(entity)
            .if_not_exists()
            .to_owned()
            .to_string(SqliteQueryBuilder);
        self.inner.execute_unprepared(&create_sql).await?;
        Ok(())
    }
}

impl ConnectionTrait for TodoDb {
    fn get_database_backend(&self) -> DatabaseBackend {
        self.inner.get_database_backend()
    }

    fn execute_raw<'life0, 'async_trait>(
        &'life0 self,
        stmt: Statement,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ExecResult, DbErr>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        log::trace!("execute: {stmt}");
        Box::pin(async move { self.inner.execute_raw(stmt).await })
    }

    fn execute_unprepared<'life0, 'life1, 'async_trait>(
        &'life0 self,
        sql: &'life1 str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ExecResult, DbErr>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        log::trace!("execute unprepared: {sql}");
        Box::pin(async move { self.inner.execute_unprepared(sql).await })
    }

    fn query_one_raw<'life0, 'async_trait>(
        &'life0 self,
        stmt: Statement,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<Output = Result<Option<QueryResult>, DbErr>>
                + Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        // SeaORM routes INSERT ... RETURNING through here as well
        log::trace!("query one: {stmt}");
        Box::pin(async move { self.inner.query_one_raw(stmt).await })
    }

    fn query_all_raw<'life0, 'async_trait>(
        &'life0 self,
        stmt: Statement,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<Output = Result<Vec<QueryResult>, DbErr>>
                + Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        log::trace!("query all: {stmt}");
        Box::pin(async move { self.inner.query_all_raw(stmt).await })
    }
}

/// Builder for [`TodoDb`].
pub struct TodoDbBuilder {
    database_url: String,
}

impl TodoDbBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            database_url: url.to_string(),
        }
    }

    /// Connect and make sure both tables exist.
    pub async fn build(self) -> Result<TodoDb, DbErr> {
        // Statements are already traced by TodoDb
        let mut opts = ConnectOptions::new(&self.database_url);
        opts.sqlx_logging(false);
        let inner = Database::connect(opts).await?;
        log::info!("connected to {}", self.database_url);

        let db = TodoDb::from_connection(inner);
        db.ensure_schema().await?;
        Ok(db)
    }
}
