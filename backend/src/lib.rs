pub mod constants;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use utils::config::Config;
pub use db::connection::get_db_pool;
pub use errors::{ConnectionError, ConnectionResult};

// Re-export common types
pub use sqlx::PgPool;
pub use anyhow::Result;
pub use chrono::{DateTime, Utc};
