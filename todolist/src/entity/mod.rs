//! SeaORM entities for the two persisted tables.

pub mod task;
pub mod user;
