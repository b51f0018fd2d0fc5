//! JSON function endpoints called directly by the web client.

use axum::extract::State;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::{AdminGuard, ApiJson};
use crate::models::{ContactForm, ReviewStatus};
use crate::notify::{Channel, Notification};
use crate::utils::response::{empty_success, success};
use crate::utils::validation;
use crate::utils::{AppError, AppResult};
use crate::AppState;

const MAX_SUBJECT_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct EventEmailRequest {
    pub event_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    pub to: String,
    pub subject: Option<String>,
    pub message: String,
    #[serde(default = "default_channel")]
    pub channel: Channel,
}

fn default_channel() -> Channel {
    Channel::Email
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyAction {
    Send,
    Verify,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPhoneRequest {
    pub action: VerifyAction,
    pub bid_id: Uuid,
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerificationStatus {
    pub bid_id: Uuid,
    pub phone_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_expires_at: Option<DateTime<Utc>>,
}

pub async fn send_contact_form(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> AppResult<Response> {
    state.contact.send_contact_form(form).await?;
    Ok(empty_success("Message sent successfully"))
}

pub async fn send_event_approval_email(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EventEmailRequest>,
) -> AppResult<Response> {
    let event = state
        .events
        .send_decision_email(request.event_id, ReviewStatus::Approved)
        .await?;
    Ok(success(event, "Approval email sent"))
}

pub async fn send_event_rejection_email(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EventEmailRequest>,
) -> AppResult<Response> {
    let event = state
        .events
        .send_decision_email(request.event_id, ReviewStatus::Rejected)
        .await?;
    Ok(success(event, "Rejection email sent"))
}

pub async fn send_notification(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NotificationRequest>,
) -> AppResult<Response> {
    let to = match request.channel {
        Channel::Email => validation::normalize_email(&request.to)?,
        Channel::Sms => validation::normalize_phone(&request.to)?,
    };
    let subject = validation::optional("subject", request.subject.as_deref(), MAX_SUBJECT_LEN)?;
    if request.channel == Channel::Email && subject.is_none() {
        return Err(AppError::ValidationError(
            "subject is required for email notifications".to_string(),
        ));
    }
    let message = validation::required("message", &request.message, MAX_MESSAGE_LEN)?;

    state
        .notifier
        .send(&Notification::custom(request.channel, &to, subject, message))
        .await?;
    tracing::info!(channel = request.channel.as_str(), to = %to, "Notification sent");

    Ok(empty_success("Notification sent"))
}

pub async fn verify_phone(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyPhoneRequest>,
) -> AppResult<Response> {
    match request.action {
        VerifyAction::Send => {
            let bid = state.bids.send_verification_code(request.bid_id).await?;
            let status = VerificationStatus {
                bid_id: bid.id,
                phone_verified: bid.phone_verified,
                code_expires_at: bid.verification_expires_at,
            };
            Ok(success(status, "Verification code sent"))
        }
        VerifyAction::Verify => {
            let code = request
                .code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| AppError::ValidationError("code is required".to_string()))?;

            let bid = state.bids.verify_phone(request.bid_id, code).await?;
            let status = VerificationStatus {
                bid_id: bid.id,
                phone_verified: bid.phone_verified,
                code_expires_at: None,
            };
            Ok(success(status, "Phone number verified"))
        }
    }
}
