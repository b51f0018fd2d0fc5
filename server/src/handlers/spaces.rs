use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath};
use crate::models::NewSpaceRequest;
use crate::utils::response::{created, success};
use crate::utils::AppResult;
use crate::AppState;

pub async fn list_spaces(State(state): State<AppState>) -> AppResult<Response> {
    let spaces = state.spaces.list_spaces().await?;
    Ok(success(spaces, "Event spaces retrieved"))
}

pub async fn get_space(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let space = state.spaces.get_space(id).await?;
    Ok(success(space, "Event space retrieved"))
}

pub async fn submit_space_request(
    State(state): State<AppState>,
    ApiPath(space_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<NewSpaceRequest>,
) -> AppResult<Response> {
    let request = state.spaces.submit_space_request(space_id, input).await?;
    Ok(created(request, "Rental request submitted"))
}
