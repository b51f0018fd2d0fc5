//! Persistence seam.
//!
//! The workflow services only talk to [`Store`]; `PgStore` backs production
//! and `MemoryStore` backs tests and the `memory` backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Bid, BidDraft, Event, EventSpace, NewEvent, NewEventSpace, NewSpaceRequest, ReviewStatus,
    SpaceRequest,
};
use crate::utils::AppResult;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// insert a pending event
    async fn insert_event(&self, event: NewEvent) -> AppResult<Event>;
    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>>;
    /// list events by start date, newest submission first on ties, optionally filtered by status
    async fn list_events(&self, status: Option<ReviewStatus>) -> AppResult<Vec<Event>>;
    async fn update_event_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        rejection_reason: Option<String>,
    ) -> AppResult<Option<Event>>;

    /// find a bid on `event_id` with the same normalized email and phone
    async fn find_duplicate_bid(
        &self,
        event_id: Uuid,
        email: &str,
        phone: &str,
    ) -> AppResult<Option<Bid>>;
    /// insert a pending, unverified bid
    async fn insert_bid(&self, bid: BidDraft) -> AppResult<Bid>;
    async fn get_bid(&self, id: Uuid) -> AppResult<Option<Bid>>;
    async fn list_bids_for_event(&self, event_id: Uuid) -> AppResult<Vec<Bid>>;
    /// store an outstanding verification code, replacing any previous one and
    /// resetting the attempt counter
    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Bid>>;
    /// count a wrong guess; the code is cleared once `max_attempts` is reached.
    /// `None` when the bid is missing or already verified
    async fn record_failed_attempt(&self, id: Uuid, max_attempts: i32) -> AppResult<Option<Bid>>;
    /// set `phone_verified` and clear the code, only if the bid is still
    /// unverified and `code` is the outstanding one. `None` when nothing changed
    async fn mark_phone_verified(&self, id: Uuid, code: &str) -> AppResult<Option<Bid>>;
    async fn update_bid_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        admin_response: Option<String>,
    ) -> AppResult<Option<Bid>>;

    async fn insert_space(&self, space: NewEventSpace) -> AppResult<EventSpace>;
    async fn get_space(&self, id: Uuid) -> AppResult<Option<EventSpace>>;
    /// active spaces only
    async fn list_spaces(&self) -> AppResult<Vec<EventSpace>>;
    async fn insert_space_request(
        &self,
        space_id: Uuid,
        request: NewSpaceRequest,
    ) -> AppResult<SpaceRequest>;
    async fn get_space_request(&self, id: Uuid) -> AppResult<Option<SpaceRequest>>;
    async fn list_space_requests(&self, space_id: Option<Uuid>) -> AppResult<Vec<SpaceRequest>>;
    async fn update_space_request_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        admin_response: Option<String>,
    ) -> AppResult<Option<SpaceRequest>>;
}
