use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::config::Config;
use crate::models::{
    Bid, BidDraft, Event, EventSpace, NewEvent, NewEventSpace, NewSpaceRequest, ReviewStatus,
    SpaceRequest,
};
use crate::utils::AppResult;

const EVENT_COLUMNS: &str = "id, title, description, location, start_date, end_date, min_bid, \
     max_bid, organizer_name, organizer_email, organizer_phone, status, \
     requires_phone_verification, rejection_reason, created_at, updated_at";

const BID_COLUMNS: &str = "id, event_id, brand_name, contact_name, email, phone, amount, message, \
     status, phone_verified, verification_code, verification_expires_at, verification_attempts, \
     admin_response, created_at, updated_at";

const SPACE_COLUMNS: &str = "id, name, description, location, capacity, price_per_day, \
     contact_email, is_active, created_at, updated_at";

const SPACE_REQUEST_COLUMNS: &str = "id, space_id, requester_name, requester_email, \
     requester_phone, event_date, guest_count, message, status, admin_response, created_at, \
     updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies the bundled migrations.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        tracing::info!("Successfully connected to database");

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

        tracing::info!("Migrations run successfully");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        let sql = format!(
            "INSERT INTO events (title, description, location, start_date, end_date, min_bid, \
             max_bid, organizer_name, organizer_email, organizer_phone, status, \
             requires_phone_verification) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {}",
            EVENT_COLUMNS
        );

        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(event.title)
            .bind(event.description)
            .bind(event.location)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(event.min_bid)
            .bind(event.max_bid)
            .bind(event.organizer_name)
            .bind(event.organizer_email)
            .bind(event.organizer_phone)
            .bind(ReviewStatus::Pending.as_str())
            .bind(event.requires_phone_verification)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_events(&self, status: Option<ReviewStatus>) -> AppResult<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY start_date ASC, created_at DESC",
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Event>(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_event_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        rejection_reason: Option<String>,
    ) -> AppResult<Option<Event>> {
        let sql = format!(
            "UPDATE events SET status = $2, rejection_reason = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        );
        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(rejection_reason)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_duplicate_bid(
        &self,
        event_id: Uuid,
        email: &str,
        phone: &str,
    ) -> AppResult<Option<Bid>> {
        let sql = format!(
            "SELECT {} FROM bids WHERE event_id = $1 AND email = $2 AND phone = $3 LIMIT 1",
            BID_COLUMNS
        );
        let row = sqlx::query_as::<_, Bid>(&sql)
            .bind(event_id)
            .bind(email)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_bid(&self, bid: BidDraft) -> AppResult<Bid> {
        let sql = format!(
            "INSERT INTO bids (event_id, brand_name, contact_name, email, phone, amount, message, \
             status, phone_verified) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE) \
             RETURNING {}",
            BID_COLUMNS
        );
        let row = sqlx::query_as::<_, Bid>(&sql)
            .bind(bid.event_id)
            .bind(bid.brand_name)
            .bind(bid.contact_name)
            .bind(bid.email)
            .bind(bid.phone)
            .bind(bid.amount)
            .bind(bid.message)
            .bind(ReviewStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_bid(&self, id: Uuid) -> AppResult<Option<Bid>> {
        let sql = format!("SELECT {} FROM bids WHERE id = $1", BID_COLUMNS);
        let row = sqlx::query_as::<_, Bid>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_bids_for_event(&self, event_id: Uuid) -> AppResult<Vec<Bid>> {
        let sql = format!(
            "SELECT {} FROM bids WHERE event_id = $1 ORDER BY created_at DESC",
            BID_COLUMNS
        );
        let rows = sqlx::query_as::<_, Bid>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Bid>> {
        let sql = format!(
            "UPDATE bids SET verification_code = $2, verification_expires_at = $3, \
             verification_attempts = 0, updated_at = NOW() WHERE id = $1 RETURNING {}",
            BID_COLUMNS
        );
        let row = sqlx::query_as::<_, Bid>(&sql)
            .bind(id)
            .bind(code)
            .bind(expires_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn record_failed_attempt(&self, id: Uuid, max_attempts: i32) -> AppResult<Option<Bid>> {
        // SET expressions see the pre-update row.
        let sql = format!(
            "UPDATE bids SET verification_attempts = verification_attempts + 1, \
             verification_code = CASE WHEN verification_attempts + 1 >= $2 \
                 THEN NULL ELSE verification_code END, \
             verification_expires_at = CASE WHEN verification_attempts + 1 >= $2 \
                 THEN NULL ELSE verification_expires_at END, \
             updated_at = NOW() \
             WHERE id = $1 AND NOT phone_verified RETURNING {}",
            BID_COLUMNS
        );
        let row = sqlx::query_as::<_, Bid>(&sql)
            .bind(id)
            .bind(max_attempts)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn mark_phone_verified(&self, id: Uuid, code: &str) -> AppResult<Option<Bid>> {
        let sql = format!(
            "UPDATE bids SET phone_verified = TRUE, verification_code = NULL, \
             verification_expires_at = NULL, verification_attempts = 0, updated_at = NOW() \
             WHERE id = $1 AND NOT phone_verified AND verification_code = $2 RETURNING {}",
            BID_COLUMNS
        );
        let row = sqlx::query_as::<_, Bid>(&sql)
            .bind(id)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_bid_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        admin_response: Option<String>,
    ) -> AppResult<Option<Bid>> {
        let sql = format!(
            "UPDATE bids SET status = $2, admin_response = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            BID_COLUMNS
        );
        let row = sqlx::query_as::<_, Bid>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(admin_response)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_space(&self, space: NewEventSpace) -> AppResult<EventSpace> {
        let sql = format!(
            "INSERT INTO event_spaces (name, description, location, capacity, price_per_day, \
             contact_email, is_active) VALUES ($1, $2, $3, $4, $5, $6, TRUE) RETURNING {}",
            SPACE_COLUMNS
        );
        let row = sqlx::query_as::<_, EventSpace>(&sql)
            .bind(space.name)
            .bind(space.description)
            .bind(space.location)
            .bind(space.capacity)
            .bind(space.price_per_day)
            .bind(space.contact_email)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_space(&self, id: Uuid) -> AppResult<Option<EventSpace>> {
        let sql = format!("SELECT {} FROM event_spaces WHERE id = $1", SPACE_COLUMNS);
        let row = sqlx::query_as::<_, EventSpace>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_spaces(&self) -> AppResult<Vec<EventSpace>> {
        let sql = format!(
            "SELECT {} FROM event_spaces WHERE is_active ORDER BY name ASC",
            SPACE_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventSpace>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_space_request(
        &self,
        space_id: Uuid,
        request: NewSpaceRequest,
    ) -> AppResult<SpaceRequest> {
        let sql = format!(
            "INSERT INTO space_requests (space_id, requester_name, requester_email, \
             requester_phone, event_date, guest_count, message, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            SPACE_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, SpaceRequest>(&sql)
            .bind(space_id)
            .bind(request.requester_name)
            .bind(request.requester_email)
            .bind(request.requester_phone)
            .bind(request.event_date)
            .bind(request.guest_count)
            .bind(request.message)
            .bind(ReviewStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_space_request(&self, id: Uuid) -> AppResult<Option<SpaceRequest>> {
        let sql = format!(
            "SELECT {} FROM space_requests WHERE id = $1",
            SPACE_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, SpaceRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_space_requests(&self, space_id: Option<Uuid>) -> AppResult<Vec<SpaceRequest>> {
        let sql = format!(
            "SELECT {} FROM space_requests WHERE ($1::uuid IS NULL OR space_id = $1) \
             ORDER BY created_at DESC",
            SPACE_REQUEST_COLUMNS
        );
        let rows = sqlx::query_as::<_, SpaceRequest>(&sql)
            .bind(space_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_space_request_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        admin_response: Option<String>,
    ) -> AppResult<Option<SpaceRequest>> {
        let sql = format!(
            "UPDATE space_requests SET status = $2, admin_response = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            SPACE_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, SpaceRequest>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(admin_response)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
