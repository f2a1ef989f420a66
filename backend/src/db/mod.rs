pub mod connection;
pub mod connections;
pub mod dismissals;
pub mod migrations;
pub mod store;
pub mod users;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod memory;

pub use connection::{get_db_pool, DatabaseConfig};
pub use store::{ConnectionStore, PgStore};
