use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{admin, events, functions, health_check, spaces};
use crate::AppState;

fn function_routes() -> Router<AppState> {
    Router::new()
        .route("/send-contact-form", post(functions::send_contact_form))
        .route(
            "/send-event-approval-email",
            post(functions::send_event_approval_email),
        )
        .route(
            "/send-event-rejection-email",
            post(functions::send_event_rejection_email),
        )
        .route("/send-notification", post(functions::send_notification))
        .route("/verify-phone", post(functions::verify_phone))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events).post(events::submit_event))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id/bids", post(events::submit_bid))
        .route("/spaces", get(spaces::list_spaces))
        .route("/spaces/:id", get(spaces::get_space))
        .route("/spaces/:id/requests", post(spaces::submit_space_request))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(admin::list_events))
        .route("/events/:id/approve", post(admin::approve_event))
        .route("/events/:id/reject", post(admin::reject_event))
        .route("/events/:id/bids", get(admin::list_bids))
        .route("/bids/:id/respond", post(admin::respond_to_bid))
        .route("/spaces", post(admin::create_space))
        .route("/space-requests", get(admin::list_space_requests))
        .route(
            "/space-requests/:id/respond",
            post(admin::respond_to_space_request),
        )
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/functions/v1", function_routes())
        .nest("/api", public_routes())
        .nest("/api/admin", admin_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
