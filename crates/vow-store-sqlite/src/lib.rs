//! SQLite backend for the Vow planner store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Documents are stored as JSON bodies,
//! one table per collection; an in-process change feed drives realtime
//! subscriptions.

mod encode;
mod feed;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use feed::{Change, ChangeTarget};
pub use store::SqliteStore;
