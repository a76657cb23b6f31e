//! Fire-and-forget customer notifications
//!
//! Updates enqueue a `Notification` on a bounded channel drained by one
//! background worker. Callers never wait for delivery; each notification is
//! attempted once and every attempt, successful or not, is recorded as a
//! `notification_sent` audit event. Failures otherwise only show up in the logs.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::models::order::OrderStatus;
use crate::services::audit::{events, AuditLogger};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub email: String,
    pub order_id: i64,
    pub status: OrderStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Stand-in for an email provider; only logs the message it would send.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockEmailSink;

#[async_trait]
impl NotificationSink for MockEmailSink {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        tracing::debug!(
            email = %notification.email,
            "Order {} is now {}",
            notification.order_id,
            notification.status
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<Notification>,
}

impl NotificationDispatcher {
    /// Start the delivery worker. It stops once every dispatcher clone is dropped
    /// and the queue has drained.
    pub fn spawn(
        sink: Arc<dyn NotificationSink>,
        audit: AuditLogger,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let worker = tokio::spawn(run_worker(rx, sink, audit));
        (Self { tx }, worker)
    }

    /// Queue a notification without waiting for it to be delivered.
    pub fn dispatch(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(notification)) => {
                tracing::debug!(order_id = notification.order_id, "Notification queue full, deferring");
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tx.send(notification).await {
                        tracing::warn!(order_id = e.0.order_id, "Notification worker stopped, dropping notification");
                    }
                });
            }
            Err(TrySendError::Closed(notification)) => {
                tracing::warn!(order_id = notification.order_id, "Notification worker stopped, dropping notification");
            }
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<Notification>,
    sink: Arc<dyn NotificationSink>,
    audit: AuditLogger,
) {
    while let Some(notification) = rx.recv().await {
        if let Err(e) = sink.send(&notification).await {
            tracing::warn!(order_id = notification.order_id, error = %e, "Notification delivery failed");
        }
        audit.record_system(
            events::NOTIFICATION_SENT,
            notification.order_id,
            format!("{} notified of status {}", notification.email, notification.status),
        );
    }
    tracing::debug!("Notification worker exiting");
}
