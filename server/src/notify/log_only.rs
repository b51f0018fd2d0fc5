use async_trait::async_trait;

use super::{Notification, Notifier, NotifyError};

/// Writes notifications to the log instead of delivering them.
///
/// Used when no delivery gateway is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            kind = notification.kind.as_str(),
            channel = notification.channel.as_str(),
            to = %notification.to,
            subject = notification.subject.as_deref().unwrap_or(""),
            "Notification (no gateway configured)"
        );
        Ok(())
    }
}
