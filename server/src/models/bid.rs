use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ReviewStatus;

/// A brand's sponsorship offer against an event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub event_id: Uuid,
    pub brand_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub amount: Decimal,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ReviewStatus,
    pub phone_verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub verification_expires_at: Option<DateTime<Utc>>,
    /// Wrong guesses against the outstanding code.
    #[serde(skip_serializing, default)]
    pub verification_attempts: i32,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBid {
    pub brand_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub amount: Decimal,
    pub message: Option<String>,
}

/// Validated and normalized bid ready for insertion.
#[derive(Debug, Clone)]
pub struct BidDraft {
    pub event_id: Uuid,
    pub brand_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub amount: Decimal,
    pub message: Option<String>,
}

/// Admin decision on a bid or space request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDecision {
    pub status: ReviewStatus,
    pub admin_response: Option<String>,
}

/// Outcome of a bid submission.
#[derive(Debug, Clone, Serialize)]
pub struct BidSubmission {
    pub bid: Bid,
    pub verification_required: bool,
}
