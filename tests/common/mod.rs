use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use order_service::{
    build_router,
    entities::prelude::Orders,
    services::{
        audit::{AuditLogger, AuditRecord, MemoryAuditSink},
        notification::{Notification, NotificationDispatcher, NotificationError, NotificationSink},
        order_service::OrderService,
        order_store::OrderStore,
    },
    AppState,
};
use sea_orm::{Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tower::ServiceExt;

/// Fresh in-memory SQLite database, optionally migrated
pub async fn setup_test_db(migrate: bool) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    if migrate {
        migration::Migrator::up(&db, None).await?;
    }
    Ok(db)
}

/// Forwards every notification it is asked to deliver to a channel
pub struct RecordingSink(UnboundedSender<Notification>);

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let _ = self.0.send(notification.clone());
        Ok(())
    }
}

/// Records the attempt, then reports a delivery failure
pub struct FailingSink(UnboundedSender<Notification>);

#[async_trait]
impl NotificationSink for FailingSink {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let _ = self.0.send(notification.clone());
        Err(NotificationError::Delivery("mail relay unreachable".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub audit: MemoryAuditSink,
    pub notifications: UnboundedReceiver<Notification>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_db(setup_test_db(true).await.expect("Failed to set up test DB"))
    }

    pub fn with_db(db: DatabaseConnection) -> Self {
        Self::assemble(db, |tx| Arc::new(RecordingSink(tx)) as Arc<dyn NotificationSink>)
    }

    /// App whose notification sink fails every delivery
    pub async fn with_failing_notifications() -> Self {
        let db = setup_test_db(true).await.expect("Failed to set up test DB");
        Self::assemble(db, |tx| Arc::new(FailingSink(tx)) as Arc<dyn NotificationSink>)
    }

    fn assemble<F>(db: DatabaseConnection, make_sink: F) -> Self
    where
        F: FnOnce(UnboundedSender<Notification>) -> Arc<dyn NotificationSink>,
    {
        let audit = MemoryAuditSink::new();
        let audit_logger = AuditLogger::new(Arc::new(audit.clone()));
        let (tx, notifications) = mpsc::unbounded_channel();
        let (notifier, _worker) =
            NotificationDispatcher::spawn(make_sink(tx), audit_logger.clone(), 16);

        let state = AppState {
            orders: OrderService::new(OrderStore::new(db.clone()), audit_logger, notifier),
        };

        Self {
            router: build_router(state),
            db,
            audit,
            notifications,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        role: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(role) = role {
            builder = builder.header("X-User-Role", role);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn order_count(&self) -> u64 {
        Orders::find().count(&self.db).await.unwrap()
    }

    /// Wait for the next notification handed to the sink.
    pub async fn next_notification(&mut self) -> Notification {
        tokio::time::timeout(std::time::Duration::from_secs(2), self.notifications.recv())
            .await
            .expect("Timed out waiting for notification")
            .expect("Notification channel closed")
    }

    /// Audit records carrying `event`, in emission order
    pub fn audit_events(&self, event: &str) -> Vec<AuditRecord> {
        self.audit
            .records()
            .into_iter()
            .filter(|r| r.event.as_deref() == Some(event))
            .collect()
    }

    /// Wait until `count` records for `event` have been emitted.
    pub async fn wait_for_audit_events(&self, event: &str, count: usize) -> Vec<AuditRecord> {
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(2);
        loop {
            let records = self.audit_events(event);
            if records.len() >= count || tokio::time::Instant::now() >= deadline {
                return records;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    /// Assert that no further notification arrives within a short grace period.
    pub async fn assert_no_more_notifications(&mut self) {
        let extra =
            tokio::time::timeout(std::time::Duration::from_millis(100), self.notifications.recv())
                .await;
        assert!(extra.is_err(), "Unexpected notification: {:?}", extra);
    }
}
