use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{Channel, Notification, Notifier, NotifyError};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Serialize)]
struct EmailPayload<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    kind: &'a str,
}

#[derive(Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    body: &'a str,
    kind: &'a str,
}

/// Posts notifications as JSON to an external email/SMS gateway.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    email_url: Option<String>,
    sms_url: Option<String>,
    api_key: Option<String>,
}

impl HttpNotifier {
    pub fn new(
        email_url: Option<String>,
        sms_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            email_url,
            sms_url,
            api_key,
        })
    }

    fn endpoint(&self, channel: Channel) -> Result<&str, NotifyError> {
        let url = match channel {
            Channel::Email => self.email_url.as_deref(),
            Channel::Sms => self.sms_url.as_deref(),
        };
        url.ok_or(NotifyError::ChannelUnavailable(channel))
    }

    async fn post<T: Serialize>(&self, url: &str, payload: &T) -> Result<(), NotifyError> {
        let mut request = self.client.post(url).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let url = self.endpoint(notification.channel)?;
        let kind = notification.kind.as_str();

        match notification.channel {
            Channel::Email => {
                let payload = EmailPayload {
                    to: &notification.to,
                    subject: notification.subject.as_deref().unwrap_or_default(),
                    body: &notification.body,
                    reply_to: notification.reply_to.as_deref(),
                    kind,
                };
                self.post(url, &payload).await
            }
            Channel::Sms => {
                let payload = SmsPayload {
                    to: &notification.to,
                    body: &notification.body,
                    kind,
                };
                self.post(url, &payload).await
            }
        }
    }
}
