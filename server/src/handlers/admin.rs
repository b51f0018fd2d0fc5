//! Moderation endpoints. Every handler takes an [`AdminGuard`].

use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use uuid::Uuid;

use super::extract::{AdminGuard, ApiJson, ApiPath, ApiQuery};
use crate::models::{NewEventSpace, ReviewDecision, ReviewStatus};
use crate::utils::response::{created, success};
use crate::utils::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EventFilter {
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Deserialize)]
pub struct SpaceRequestFilter {
    pub space_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectEvent {
    pub reason: Option<String>,
}

pub async fn list_events(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<EventFilter>,
) -> AppResult<Response> {
    let events = state.events.list_events(filter.status).await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn approve_event(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let event = state.events.approve_event(id).await?;
    Ok(success(event, "Event approved"))
}

pub async fn reject_event(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Option<ApiJson<RejectEvent>>,
) -> AppResult<Response> {
    let reason = body.and_then(|ApiJson(b)| b.reason);
    let event = state.events.reject_event(id, reason).await?;
    Ok(success(event, "Event rejected"))
}

pub async fn list_bids(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let bids = state.bids.list_bids(event_id).await?;
    Ok(success(bids, "Bids retrieved"))
}

pub async fn respond_to_bid(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(decision): ApiJson<ReviewDecision>,
) -> AppResult<Response> {
    let bid = state.bids.respond_to_bid(id, decision).await?;
    Ok(success(bid, "Bid updated"))
}

pub async fn create_space(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewEventSpace>,
) -> AppResult<Response> {
    let space = state.spaces.create_space(input).await?;
    Ok(created(space, "Event space created"))
}

pub async fn list_space_requests(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<SpaceRequestFilter>,
) -> AppResult<Response> {
    let requests = state.spaces.list_space_requests(filter.space_id).await?;
    Ok(success(requests, "Space requests retrieved"))
}

pub async fn respond_to_space_request(
    _admin: AdminGuard,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(decision): ApiJson<ReviewDecision>,
) -> AppResult<Response> {
    let request = state.spaces.respond_to_space_request(id, decision).await?;
    Ok(success(request, "Space request updated"))
}
