use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath};
use crate::models::{NewBid, NewEvent};
use crate::utils::response::{created, success};
use crate::utils::{AppError, AppResult};
use crate::AppState;

pub async fn list_events(State(state): State<AppState>) -> AppResult<Response> {
    let events = state.events.list_approved_events().await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let event = state.events.get_event(id).await?;
    // Pending and rejected events are only visible to admins.
    if !event.is_open_for_bids() {
        return Err(AppError::NotFound(format!("Event '{}' was not found", id)));
    }
    Ok(success(event, "Event retrieved"))
}

pub async fn submit_event(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewEvent>,
) -> AppResult<Response> {
    let event = state.events.submit_event(input).await?;
    Ok(created(event, "Event submitted for review"))
}

pub async fn submit_bid(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<NewBid>,
) -> AppResult<Response> {
    let submission = state.bids.submit_bid(event_id, input).await?;
    let message = if submission.verification_required {
        "Bid received, enter the code sent to your phone to confirm it"
    } else {
        "Bid submitted successfully"
    };
    Ok(created(submission, message))
}
