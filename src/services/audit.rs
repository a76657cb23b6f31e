//! Structured audit records for order lifecycle events
//!
//! `AuditLogger` is a cheap cloneable handle passed to the components that
//! emit events. Records are serialized as JSON objects that only contain
//! the fields that are present.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub mod events {
    pub const ORDER_CREATED: &str = "order_created";
    pub const ORDER_UPDATED: &str = "order_updated";
    pub const NOTIFICATION_SENT: &str = "notification_sent";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Destination for audit records. Emission is best-effort and cannot fail
/// from the caller's point of view.
pub trait AuditSink: Send + Sync {
    fn emit(&self, record: &AuditRecord);
}

/// Writes each record through `tracing` on target `audit`, one field per
/// record field. Absent fields are not recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, record: &AuditRecord) {
        tracing::info!(
            target: "audit",
            event = record.event.as_deref(),
            order_id = record.order_id,
            user = record.user.as_deref(),
            "{}",
            record.message.as_deref().unwrap_or_default()
        );
    }
}

/// Keeps records in memory, for inspection in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn emit(&self, record: &AuditRecord) {
        self.records.lock().push(record.clone());
    }
}

#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
}

impl AuditLogger {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingAuditSink))
    }

    /// Record a lifecycle event for `order_id` performed by `actor`.
    pub fn record(&self, event: &str, order_id: i64, actor: &str) {
        self.emit(AuditRecord {
            event: Some(event.to_string()),
            order_id: Some(order_id),
            user: Some(actor.to_string()),
            ..Default::default()
        });
    }

    /// Record an event raised by the service itself rather than a caller.
    pub fn record_system(&self, event: &str, order_id: i64, message: impl Into<String>) {
        self.emit(AuditRecord {
            event: Some(event.to_string()),
            order_id: Some(order_id),
            message: Some(message.into()),
            ..Default::default()
        });
    }

    fn emit(&self, mut record: AuditRecord) {
        record.level.get_or_insert_with(|| "INFO".to_string());
        self.sink.emit(&record);
    }
}
