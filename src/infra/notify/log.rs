//! Notifier that only traces; the default when no transport is wired.

use async_trait::async_trait;

use crate::core::model::{Channel, Installer, Job};
use crate::core::notify::Notifier;

/// Logs each would-be delivery and reports success. Useful for local runs
/// where the in-app surface alone is enough to answer requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, channel: Channel, installer: &Installer, job: &Job) -> bool {
        tracing::info!(
            "confirmation request for job {} on {} to {} via {:?}",
            job.id,
            job.date,
            installer.name,
            channel
        );
        true
    }
}
