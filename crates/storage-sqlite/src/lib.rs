//! SQLite storage implementation for the live order map.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `livemap-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The order repository (write side) and reader (read-only side)
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!   core (domain, dashboard)      server (http)
//!             │                        │
//!             └───────────┬────────────┘
//!                         ▼
//!              storage-sqlite (this crate)
//!                         │
//!                         ▼
//!                     SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod orders;
pub mod schema;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from livemap-core for convenience
pub use livemap_core::errors::{DatabaseError, Error, Result};
