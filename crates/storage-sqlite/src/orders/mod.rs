//! SQLite storage implementation for orders.

mod model;
mod repository;

pub use model::{NewOrderDB, OrderDB};
pub use repository::{OrderReader, OrderRepository};
