//! Notification seam toward external delivery transports.

use async_trait::async_trait;

use crate::core::model::{Channel, Installer, Job};

/// Abstraction over outbound confirmation-request delivery.
///
/// Delivery is fire-and-forget from the engine's perspective: a `false`
/// return is logged and surfaced as a non-fatal warning, never retried, and
/// never rolls back the underlying request. The request stays answerable
/// through any channel that did succeed, including the in-app fallback.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a confirmation ask for `job` to `installer` over `channel`.
    /// Returns whether delivery succeeded.
    async fn send(&self, channel: Channel, installer: &Installer, job: &Job) -> bool;
}
