//! SQLite backend for Lovers' Base.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Multi-step writes run inside
//! `BEGIN IMMEDIATE` transactions, so they are safe even when several
//! processes share one database file.

mod encode;
mod links;
mod schema;
mod store;

pub mod config;
pub mod error;

pub use crate::config::StoreConfig;
pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
