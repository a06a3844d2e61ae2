//! Database models for orders.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for orders
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OrderDB {
    pub id: i64,
    pub store_number: String,
    pub store_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub time_placed: String,
    pub time_ready: String,
}

/// Database model for inserting an order; `id` is assigned by SQLite.
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderDB {
    pub store_number: String,
    pub store_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub time_placed: String,
    pub time_ready: String,
}

// Conversion to domain models
impl From<OrderDB> for livemap_core::orders::Order {
    fn from(db: OrderDB) -> Self {
        Self {
            id: db.id,
            store_number: db.store_number,
            store_name: db.store_name,
            latitude: db.latitude,
            longitude: db.longitude,
            time_placed: db.time_placed,
            time_ready: db.time_ready,
        }
    }
}

impl From<livemap_core::orders::NewOrder> for NewOrderDB {
    fn from(domain: livemap_core::orders::NewOrder) -> Self {
        Self {
            store_number: domain.store_number,
            store_name: domain.store_name,
            latitude: domain.latitude,
            longitude: domain.longitude,
            time_placed: domain.time_placed,
            time_ready: domain.time_ready,
        }
    }
}
