//! Order lifecycle operations
//!
//! Composes the store, audit logger and notification dispatcher. Mutations
//! require a `Staff` capability obtained from the access gate, and take
//! payloads that have already been validated.

use crate::error::ApiError;
use crate::models::order::{NewOrder, Order, OrderStatus};
use crate::services::access::Staff;
use crate::services::audit::{events, AuditLogger};
use crate::services::notification::{Notification, NotificationDispatcher};
use crate::services::order_store::OrderStore;

#[derive(Clone)]
pub struct OrderService {
    store: OrderStore,
    audit: AuditLogger,
    notifier: NotificationDispatcher,
}

impl OrderService {
    pub fn new(store: OrderStore, audit: AuditLogger, notifier: NotificationDispatcher) -> Self {
        Self {
            store,
            audit,
            notifier,
        }
    }

    pub async fn create_order(&self, staff: &Staff, new_order: NewOrder) -> Result<Order, ApiError> {
        let order = self.store.create(&new_order).await?;
        self.audit.record(events::ORDER_CREATED, order.id, staff.role());
        Ok(order)
    }

    /// Replace an order's status, then queue a customer notification. The
    /// notification outcome never affects the result.
    pub async fn update_order(
        &self,
        staff: &Staff,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let order = self.store.update_status(order_id, status).await?;
        self.audit.record(events::ORDER_UPDATED, order.id, staff.role());

        self.notifier.dispatch(Notification {
            email: order.customer_email.clone(),
            order_id: order.id,
            status: order.status,
        });

        Ok(order)
    }

    pub async fn get_order(&self, order_id: i64) -> Result<Order, ApiError> {
        Ok(self.store.get_by_id(order_id).await?)
    }
}
