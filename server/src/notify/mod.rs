//! Outgoing email/SMS.
//!
//! Delivery itself is an external gateway; this module builds the messages
//! and hands them to a [`Notifier`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::AppError;

mod http;
mod log_only;
mod message;
mod recording;

pub use self::http::HttpNotifier;
pub use self::log_only::LogNotifier;
pub use self::recording::RecordingNotifier;
pub use message::{Notification, NotificationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no gateway configured for {} notifications", .0.as_str())]
    ChannelUnavailable(Channel),

    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway rejected notification with status {status}")]
    Rejected { status: u16 },

    #[error("{0}")]
    Other(String),
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        AppError::ExternalServiceError(format!("Failed to send notification: {}", err))
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Sends `notification` and logs a failure instead of returning it.
///
/// Returns whether the gateway accepted the message.
pub async fn dispatch(notifier: &dyn Notifier, notification: Notification) -> bool {
    match notifier.send(&notification).await {
        Ok(()) => {
            tracing::debug!(
                kind = notification.kind.as_str(),
                channel = notification.channel.as_str(),
                "Notification dispatched"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                kind = notification.kind.as_str(),
                channel = notification.channel.as_str(),
                error = %e,
                "Notification dispatch failed"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_swallows_failures() {
        let notifier = RecordingNotifier::failing();
        let sent = dispatch(
            &notifier,
            Notification::custom(Channel::Email, "a@b.com", Some("Hi".into()), "Body".into()),
        )
        .await;
        assert!(!sent);
        assert_eq!(notifier.count(), 1);
    }
}
