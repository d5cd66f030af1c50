//! Audit sink implementations.
//!
//! Every engine transition (dispatch, accept, decline, cancel, reconcile)
//! emits an audit event. Provides an in-memory sink and Postgres schema
//! definitions for audit persistence.

use std::collections::VecDeque;

use crate::core::model::{InstallerId, JobId};
use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related job identifier.
    pub job_id: JobId,
    /// Related installer, when the action concerns one.
    pub installer_id: Option<InstallerId>,
    /// Action taken (dispatch, notify_failed, accept, reaccept, decline,
    /// cancel, reschedule, complete, reconcile, manual_task, resolve).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Postgres-backed audit sink (schema-only; DB I/O not wired).
pub struct PostgresAuditSink;

impl PostgresAuditSink {
    /// Returns SQL migration statements for the audit log.
    #[must_use]
    pub const fn migrations() -> &'static [&'static str] {
        &[
            r"
CREATE TABLE IF NOT EXISTS cd_audit_events (
    event_id TEXT PRIMARY KEY,
    job_id UUID NOT NULL,
    installer_id UUID,
    action TEXT NOT NULL,
    detail TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_cd_audit_events_job_created ON cd_audit_events (job_id, created_at);
CREATE INDEX IF NOT EXISTS idx_cd_audit_events_installer ON cd_audit_events (installer_id);
",
        ]
    }
}

impl AuditSink for PostgresAuditSink {
    fn record(&mut self, _event: AuditEvent) {
        // Stub: actual DB writes require a runtime + client; left to integration layer.
    }
}

/// Helper to build an audit event from context.
#[must_use]
pub fn build_audit_event(
    job_id: JobId,
    installer_id: Option<InstallerId>,
    action: impl Into<String>,
    detail: Option<String>,
) -> AuditEvent {
    let action = action.into();
    let created_at_ms = now_ms();
    AuditEvent {
        event_id: format!("{job_id}-{action}-{created_at_ms}"),
        job_id,
        installer_id,
        action,
        created_at_ms,
        detail,
    }
}
