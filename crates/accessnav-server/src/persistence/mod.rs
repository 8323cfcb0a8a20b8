//! Persistence layer for the navigation server.
//!
//! SQLite-backed storage for accessibility points, saved routes and user
//! preferences.

pub mod db;
pub mod points;
pub mod preferences;
pub mod routes;

pub use db::{init_database, Database};
pub use points::SqlitePointStore;
