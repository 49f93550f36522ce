//! Data layer: credential store and shared row types

pub mod sqlite;
pub mod types;

pub use sqlite::{SqliteError, SqliteService};
