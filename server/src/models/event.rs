use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ReviewStatus;

/// An organizer's event listing. Brands can only bid once it is approved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub min_bid: Option<Decimal>,
    pub max_bid: Option<Decimal>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub organizer_phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ReviewStatus,
    pub requires_phone_verification: bool,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_open_for_bids(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    /// Checks `amount` against whichever bounds the organizer set.
    pub fn accepts_amount(&self, amount: Decimal) -> bool {
        self.min_bid.map_or(true, |min| amount >= min)
            && self.max_bid.map_or(true, |max| amount <= max)
    }
}

/// Organizer submission payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub min_bid: Option<Decimal>,
    pub max_bid: Option<Decimal>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub organizer_phone: Option<String>,
    #[serde(default)]
    pub requires_phone_verification: bool,
}
