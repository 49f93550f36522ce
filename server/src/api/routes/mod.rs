//! API route handlers

pub mod auth;
pub mod dashboards;
pub mod health;
pub mod predict;
