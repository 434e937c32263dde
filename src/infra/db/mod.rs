//! SQLite persistence (infrastructure).

pub mod database;

pub use database::Database;
