use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::models::{
    Bid, BidDraft, Event, EventSpace, NewEvent, NewEventSpace, NewSpaceRequest, ReviewStatus,
    SpaceRequest,
};
use crate::utils::AppResult;

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    bids: HashMap<Uuid, Bid>,
    spaces: HashMap<Uuid, EventSpace>,
    space_requests: HashMap<Uuid, SpaceRequest>,
}

/// Process-local store. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(rows: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        let now = Utc::now();
        let row = Event {
            id: Uuid::new_v4(),
            title: event.title,
            description: event.description,
            location: event.location,
            start_date: event.start_date,
            end_date: event.end_date,
            min_bid: event.min_bid,
            max_bid: event.max_bid,
            organizer_name: event.organizer_name,
            organizer_email: event.organizer_email,
            organizer_phone: event.organizer_phone,
            status: ReviewStatus::Pending,
            requires_phone_verification: event.requires_phone_verification,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .events
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self, status: Option<ReviewStatus>) -> AppResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Event> = tables
            .events
            .values()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn update_event_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        rejection_reason: Option<String>,
    ) -> AppResult<Option<Event>> {
        let mut tables = self.tables.write().await;
        Ok(tables.events.get_mut(&id).map(|event| {
            event.status = status;
            event.rejection_reason = rejection_reason;
            event.updated_at = Utc::now();
            event.clone()
        }))
    }

    async fn find_duplicate_bid(
        &self,
        event_id: Uuid,
        email: &str,
        phone: &str,
    ) -> AppResult<Option<Bid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bids
            .values()
            .find(|b| b.event_id == event_id && b.email == email && b.phone == phone)
            .cloned())
    }

    async fn insert_bid(&self, bid: BidDraft) -> AppResult<Bid> {
        let now = Utc::now();
        let row = Bid {
            id: Uuid::new_v4(),
            event_id: bid.event_id,
            brand_name: bid.brand_name,
            contact_name: bid.contact_name,
            email: bid.email,
            phone: bid.phone,
            amount: bid.amount,
            message: bid.message,
            status: ReviewStatus::Pending,
            phone_verified: false,
            verification_code: None,
            verification_expires_at: None,
            verification_attempts: 0,
            admin_response: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.bids.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_bid(&self, id: Uuid) -> AppResult<Option<Bid>> {
        Ok(self.tables.read().await.bids.get(&id).cloned())
    }

    async fn list_bids_for_event(&self, event_id: Uuid) -> AppResult<Vec<Bid>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Bid> = tables
            .bids
            .values()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |b| b.created_at);
        Ok(rows)
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Bid>> {
        let mut tables = self.tables.write().await;
        Ok(tables.bids.get_mut(&id).map(|bid| {
            bid.verification_code = Some(code.to_string());
            bid.verification_expires_at = Some(expires_at);
            bid.verification_attempts = 0;
            bid.updated_at = Utc::now();
            bid.clone()
        }))
    }

    async fn record_failed_attempt(&self, id: Uuid, max_attempts: i32) -> AppResult<Option<Bid>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .bids
            .get_mut(&id)
            .filter(|bid| !bid.phone_verified)
            .map(|bid| {
                bid.verification_attempts += 1;
                if bid.verification_attempts >= max_attempts {
                    bid.verification_code = None;
                    bid.verification_expires_at = None;
                }
                bid.updated_at = Utc::now();
                bid.clone()
            }))
    }

    async fn mark_phone_verified(&self, id: Uuid, code: &str) -> AppResult<Option<Bid>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .bids
            .get_mut(&id)
            .filter(|bid| !bid.phone_verified && bid.verification_code.as_deref() == Some(code))
            .map(|bid| {
                bid.phone_verified = true;
                bid.verification_code = None;
                bid.verification_expires_at = None;
                bid.verification_attempts = 0;
                bid.updated_at = Utc::now();
                bid.clone()
            }))
    }

    async fn update_bid_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        admin_response: Option<String>,
    ) -> AppResult<Option<Bid>> {
        let mut tables = self.tables.write().await;
        Ok(tables.bids.get_mut(&id).map(|bid| {
            bid.status = status;
            bid.admin_response = admin_response;
            bid.updated_at = Utc::now();
            bid.clone()
        }))
    }

    async fn insert_space(&self, space: NewEventSpace) -> AppResult<EventSpace> {
        let now = Utc::now();
        let row = EventSpace {
            id: Uuid::new_v4(),
            name: space.name,
            description: space.description,
            location: space.location,
            capacity: space.capacity,
            price_per_day: space.price_per_day,
            contact_email: space.contact_email,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .spaces
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_space(&self, id: Uuid) -> AppResult<Option<EventSpace>> {
        Ok(self.tables.read().await.spaces.get(&id).cloned())
    }

    async fn list_spaces(&self) -> AppResult<Vec<EventSpace>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<EventSpace> = tables
            .spaces
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn insert_space_request(
        &self,
        space_id: Uuid,
        request: NewSpaceRequest,
    ) -> AppResult<SpaceRequest> {
        let now = Utc::now();
        let row = SpaceRequest {
            id: Uuid::new_v4(),
            space_id,
            requester_name: request.requester_name,
            requester_email: request.requester_email,
            requester_phone: request.requester_phone,
            event_date: request.event_date,
            guest_count: request.guest_count,
            message: request.message,
            status: ReviewStatus::Pending,
            admin_response: None,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .space_requests
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_space_request(&self, id: Uuid) -> AppResult<Option<SpaceRequest>> {
        Ok(self.tables.read().await.space_requests.get(&id).cloned())
    }

    async fn list_space_requests(&self, space_id: Option<Uuid>) -> AppResult<Vec<SpaceRequest>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<SpaceRequest> = tables
            .space_requests
            .values()
            .filter(|r| space_id.map_or(true, |id| r.space_id == id))
            .cloned()
            .collect();
        newest_first(&mut rows, |r| r.created_at);
        Ok(rows)
    }

    async fn update_space_request_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        admin_response: Option<String>,
    ) -> AppResult<Option<SpaceRequest>> {
        let mut tables = self.tables.write().await;
        Ok(tables.space_requests.get_mut(&id).map(|request| {
            request.status = status;
            request.admin_response = admin_response;
            request.updated_at = Utc::now();
            request.clone()
        }))
    }
}
