//! In-memory notifier that records deliveries, with scriptable failures.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::model::{Channel, Installer, InstallerId, Job, JobId};
use crate::core::notify::Notifier;

/// One recorded delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Channel used.
    pub channel: Channel,
    /// Installer addressed.
    pub installer_id: InstallerId,
    /// Job referenced.
    pub job_id: JobId,
    /// Whether delivery succeeded.
    pub delivered: bool,
}

/// Notifier for development and testing: records every attempt and can be
/// told to fail specific channels.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: Mutex<HashSet<Channel>>,
}

impl RecordingNotifier {
    /// Create a notifier that delivers everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future send on `channel` report failed delivery.
    pub fn fail_channel(&self, channel: Channel) {
        self.failing.lock().insert(channel);
    }

    /// Restore delivery on all channels.
    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }

    /// Snapshot of recorded delivery attempts, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel: Channel, installer: &Installer, job: &Job) -> bool {
        let delivered = !self.failing.lock().contains(&channel);
        self.sent.lock().push(SentNotification {
            channel,
            installer_id: installer.id,
            job_id: job.id,
            delivered,
        });
        delivered
    }
}
