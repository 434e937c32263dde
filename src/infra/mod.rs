//! Infrastructure layer (adapters/implementations).
//!
//! Configuration files, SQLite storage and the rule-based schema.

pub mod app_config;
pub mod db;
pub mod schema;
pub mod store;
