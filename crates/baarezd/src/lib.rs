//! Baarez daemon library - exposes modules for testing.

pub mod config;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod server;
