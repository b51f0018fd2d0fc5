use std::sync::Mutex;

use async_trait::async_trait;

use super::{Notification, NotificationKind, Notifier, NotifyError};

/// Keeps every notification in memory. Used by tests to count dispatches.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records each call, then reports a gateway failure.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or_default()
    }

    pub fn count_kind(&self, kind: NotificationKind) -> usize {
        self.sent
            .lock()
            .map(|s| s.iter().filter(|n| n.kind == kind).count())
            .unwrap_or_default()
    }

    /// Most recent notification of `kind`.
    pub fn last_of(&self, kind: NotificationKind) -> Option<Notification> {
        self.sent
            .lock()
            .ok()
            .and_then(|s| s.iter().rev().find(|n| n.kind == kind).cloned())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        if self.fail {
            return Err(NotifyError::Other("recording notifier set to fail".into()));
        }
        Ok(())
    }
}
