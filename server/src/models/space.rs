use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ReviewStatus;

/// A venue that can be rented for events.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventSpace {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub capacity: i32,
    pub price_per_day: Option<Decimal>,
    pub contact_email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEventSpace {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub capacity: i32,
    pub price_per_day: Option<Decimal>,
    pub contact_email: String,
}

/// A rental inquiry for an [`EventSpace`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpaceRequest {
    pub id: Uuid,
    pub space_id: Uuid,
    pub requester_name: String,
    pub requester_email: String,
    pub requester_phone: Option<String>,
    pub event_date: NaiveDate,
    pub guest_count: i32,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ReviewStatus,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSpaceRequest {
    pub requester_name: String,
    pub requester_email: String,
    pub requester_phone: Option<String>,
    pub event_date: NaiveDate,
    pub guest_count: i32,
    pub message: Option<String>,
}
