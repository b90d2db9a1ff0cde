use chrono::NaiveDate;
use todolist::{TodoDb, TodoDbBuilder};

/// Fresh in-memory database with both tables created.
pub async fn memory_db() -> TodoDb {
    let _ = env_logger::builder().is_test(true).try_init();
    TodoDbBuilder::new("sqlite::memory:")
        .build()
        .await
        .expect("Failed to create TodoDb")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
