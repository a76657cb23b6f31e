//! Durable order records backed by the `orders` table
//!
//! Every operation borrows a connection from the pool for its own duration
//! only; `update_status` runs its read-modify-write inside one transaction,
//! which is rolled back if dropped before commit.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, TransactionTrait};

use crate::entities::{orders, prelude::*};
use crate::models::order::{NewOrder, Order, OrderStatus, UnknownStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("order {0} not found")]
    NotFound(i64),
    #[error("order store unavailable: {0}")]
    Unavailable(#[from] DbErr),
    #[error("order {id} has an invalid row: {source}")]
    CorruptRow {
        id: i64,
        #[source]
        source: UnknownStatus,
    },
}

fn decode(row: orders::Model) -> Result<Order, StoreError> {
    let id = row.id;
    Order::from_row(row).map_err(|source| StoreError::CorruptRow { id, source })
}

#[derive(Clone)]
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new order with status `created` and return the stored record.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, StoreError> {
        let row = new_order.to_row().insert(&self.db).await?;
        tracing::debug!(order_id = row.id, "Inserted order");
        decode(row)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Order, StoreError> {
        let row = Orders::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        decode(row)
    }

    /// Replace the status of an existing order. Concurrent updates to the same
    /// order are last-writer-wins.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, StoreError> {
        let txn = self.db.begin().await?;

        let row = Orders::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        let mut order = decode(row)?;
        order.status = status;
        let updated = order.to_row().update(&txn).await?;

        txn.commit().await?;
        tracing::debug!(order_id = id, status = %status, "Updated order status");
        decode(updated)
    }
}
