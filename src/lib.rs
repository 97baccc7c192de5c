//! Bookstore application library
//!
//! Author and book resource modules plus the bootstrap that wires them into
//! the HTTP server.

pub mod app;
pub mod modules;

pub use app::{build_app, build_registry, migrate, migrate_only, run};
