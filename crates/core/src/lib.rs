//! Live order map core - domain entities, services, and traits.
//!
//! This crate holds the order model, webhook validation, the Olo timestamp
//! type and the dashboard reconciliation logic. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod events;
pub mod orders;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
