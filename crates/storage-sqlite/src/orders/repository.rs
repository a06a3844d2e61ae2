use livemap_core::errors::{DatabaseError, Error};
use livemap_core::orders::{NewOrder, OloTimestamp, Order, OrderLookup, OrderRepositoryTrait};
use livemap_core::Result;

use super::model::{NewOrderDB, OrderDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::orders;
use crate::schema::orders::dsl::*;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;

fn load_order(pool: &DbPool, order_id: i64) -> Result<Order> {
    let mut conn = get_connection(pool)?;
    let row = orders
        .find(order_id)
        .select(OrderDB::as_select())
        .first::<OrderDB>(&mut conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| Error::Database(DatabaseError::NotFound(format!("order {}", order_id))))?;
    Ok(Order::from(row))
}

fn load_ready_since(pool: &DbPool, not_before: &str) -> Result<Vec<Order>> {
    let mut conn = get_connection(pool)?;
    let rows = orders
        .filter(time_ready.ge(not_before))
        .order(id.asc())
        .select(OrderDB::as_select())
        .load::<OrderDB>(&mut conn)
        .map_err(StorageError::from)?;
    Ok(rows.into_iter().map(Order::from).collect())
}

/// Write side of order storage. Only the ingest path holds one.
pub struct OrderRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl OrderRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        OrderRepository { pool, writer }
    }

    /// A read-only handle over the same pool.
    pub fn reader(&self) -> OrderReader {
        OrderReader::new(self.pool.clone())
    }
}

#[async_trait]
impl OrderRepositoryTrait for OrderRepository {
    async fn insert_order(&self, new_order: NewOrder) -> Result<Order> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Order> {
                let new_order_db: NewOrderDB = new_order.into();
                let result_db = diesel::insert_into(orders::table)
                    .values(&new_order_db)
                    .returning(OrderDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Order::from(result_db))
            })
            .await
    }
}

/// Read-only order storage handed to dashboard sessions. Has no route to
/// the writer actor.
#[derive(Clone)]
pub struct OrderReader {
    pool: Arc<DbPool>,
}

impl OrderReader {
    pub fn new(pool: Arc<DbPool>) -> Self {
        OrderReader { pool }
    }
}

// Diesel calls block, so they run on the blocking pool; a sweep's lookups
// can then overlap.
async fn read_blocking<T, F>(pool: &Arc<DbPool>, read: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&DbPool) -> Result<T> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || read(&pool))
        .await
        .map_err(|e| Error::Database(DatabaseError::Internal(format!("Read task failed: {}", e))))?
}

#[async_trait]
impl OrderLookup for OrderReader {
    async fn get_order(&self, order_id: i64) -> Result<Order> {
        read_blocking(&self.pool, move |pool| load_order(pool, order_id)).await
    }

    async fn list_active_candidates(&self, not_before: OloTimestamp) -> Result<Vec<Order>> {
        let cutoff = not_before.to_string();
        read_blocking(&self.pool, move |pool| load_ready_since(pool, &cutoff)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, init, run_migrations, spawn_writer};
    use tempfile::TempDir;

    fn setup() -> (TempDir, OrderRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.db");
        let db_path = init(path.to_str().unwrap()).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();
        let writer = spawn_writer((*pool).clone());
        (dir, OrderRepository::new(pool, writer))
    }

    fn new_order(store: &str, ready: &str) -> NewOrder {
        NewOrder {
            store_number: store.to_string(),
            store_name: None,
            latitude: 40.7128,
            longitude: -74.006,
            time_placed: "20240315 14:05".to_string(),
            time_ready: ready.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_round_trips() {
        let (_dir, repo) = setup();

        let first = repo.insert_order(new_order("1042", "20240315 14:30")).await.unwrap();
        let second = repo.insert_order(new_order("1043", "20240315 14:45")).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.store_number, "1042");
        assert_eq!(repo.reader().get_order(first.id).await.unwrap(), first);
        assert_eq!(repo.reader().get_order(second.id).await.unwrap(), second);
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let (_dir, repo) = setup();
        let err = repo.reader().get_order(404).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn candidates_are_ready_at_or_after_cutoff() {
        let (_dir, repo) = setup();
        for ready in ["20240315 13:59", "20240315 14:00", "20240315 14:30", "20240316 08:00"] {
            repo.insert_order(new_order("1", ready)).await.unwrap();
        }

        let cutoff: OloTimestamp = "20240315 14:00".parse().unwrap();
        let ready: Vec<String> = repo
            .reader()
            .list_active_candidates(cutoff)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.time_ready)
            .collect();

        assert_eq!(ready, vec!["20240315 14:00", "20240315 14:30", "20240316 08:00"]);
    }
}
