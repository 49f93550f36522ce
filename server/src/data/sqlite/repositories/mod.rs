//! SQLite repositories

pub mod account;
