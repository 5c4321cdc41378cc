//! # storage-adapters
//!
//! Database implementations of the `domains` repository ports.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "db-sqlite")]
pub use sqlite::{SqliteStore, StoreError};
