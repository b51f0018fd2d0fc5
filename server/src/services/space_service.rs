use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::models::{EventSpace, NewEventSpace, NewSpaceRequest, ReviewDecision, SpaceRequest};
use crate::notify::{self, Notification, Notifier};
use crate::store::Store;
use crate::utils::validation;
use crate::utils::{AppError, AppResult};

const MAX_NAME_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 5000;

/// Venue listings and rental requests.
pub struct SpaceService {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    admin_email: String,
}

impl SpaceService {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, admin_email: String) -> Self {
        Self {
            store,
            notifier,
            admin_email,
        }
    }

    pub async fn list_spaces(&self) -> AppResult<Vec<EventSpace>> {
        self.store.list_spaces().await
    }

    pub async fn get_space(&self, id: Uuid) -> AppResult<EventSpace> {
        self.store
            .get_space(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event space '{}' was not found", id)))
    }

    pub async fn create_space(&self, input: NewEventSpace) -> AppResult<EventSpace> {
        if input.capacity <= 0 {
            return Err(AppError::ValidationError(
                "capacity must be greater than zero".to_string(),
            ));
        }
        let price_per_day = input
            .price_per_day
            .map(|p| validation::positive_amount("price_per_day", p))
            .transpose()?;

        let space = self
            .store
            .insert_space(NewEventSpace {
                name: validation::required("name", &input.name, MAX_NAME_LEN)?,
                description: validation::optional(
                    "description",
                    input.description.as_deref(),
                    MAX_TEXT_LEN,
                )?,
                location: validation::required("location", &input.location, MAX_NAME_LEN)?,
                capacity: input.capacity,
                price_per_day,
                contact_email: validation::normalize_email(&input.contact_email)?,
            })
            .await?;
        info!(space_id = %space.id, name = %space.name, "Event space created");
        Ok(space)
    }

    pub async fn submit_space_request(
        &self,
        space_id: Uuid,
        input: NewSpaceRequest,
    ) -> AppResult<SpaceRequest> {
        let space = self.get_space(space_id).await?;
        if !space.is_active {
            return Err(AppError::ValidationError(
                "This space is not available for rental".to_string(),
            ));
        }

        let request = validate_request(input, space.capacity)?;
        let request = self.store.insert_space_request(space_id, request).await?;
        info!(space_id = %space_id, request_id = %request.id, "Space request submitted");

        notify::dispatch(
            self.notifier.as_ref(),
            Notification::space_request_received(&self.admin_email, &space, &request),
        )
        .await;

        Ok(request)
    }

    pub async fn list_space_requests(&self, space_id: Option<Uuid>) -> AppResult<Vec<SpaceRequest>> {
        self.store.list_space_requests(space_id).await
    }

    pub async fn respond_to_space_request(
        &self,
        id: Uuid,
        decision: ReviewDecision,
    ) -> AppResult<SpaceRequest> {
        if !decision.status.is_decision() {
            return Err(AppError::ValidationError(
                "Status must be approved or rejected".to_string(),
            ));
        }
        let admin_response = validation::optional(
            "admin_response",
            decision.admin_response.as_deref(),
            MAX_TEXT_LEN,
        )?;

        let request = self
            .store
            .update_space_request_status(id, decision.status, admin_response)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Space request '{}' was not found", id)))?;
        info!(request_id = %id, status = %request.status, "Space request reviewed");

        let space = self.get_space(request.space_id).await?;
        notify::dispatch(
            self.notifier.as_ref(),
            Notification::space_request_decision(&space, &request),
        )
        .await;

        Ok(request)
    }
}

fn validate_request(input: NewSpaceRequest, capacity: i32) -> AppResult<NewSpaceRequest> {
    if input.event_date < Utc::now().date_naive() {
        return Err(AppError::ValidationError(
            "event_date must not be in the past".to_string(),
        ));
    }
    if input.guest_count <= 0 {
        return Err(AppError::ValidationError(
            "guest_count must be greater than zero".to_string(),
        ));
    }
    if input.guest_count > capacity {
        return Err(AppError::ValidationError(format!(
            "guest_count exceeds the space capacity of {}",
            capacity
        )));
    }

    let requester_phone = match input.requester_phone.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(phone) => Some(validation::normalize_phone(phone)?),
    };

    Ok(NewSpaceRequest {
        requester_name: validation::required("requester_name", &input.requester_name, MAX_NAME_LEN)?,
        requester_email: validation::normalize_email(&input.requester_email)?,
        requester_phone,
        event_date: input.event_date,
        guest_count: input.guest_count,
        message: validation::optional("message", input.message.as_deref(), MAX_TEXT_LEN)?,
    })
}
