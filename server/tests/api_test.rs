use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use sponsor_market_server::config::Config;
use sponsor_market_server::notify::{NotificationKind, RecordingNotifier};
use sponsor_market_server::routes::create_routes;
use sponsor_market_server::store::MemoryStore;
use sponsor_market_server::AppState;

const ADMIN_TOKEN: &str = "test-admin-token";

struct TestApp {
    router: Router,
    notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    fn new() -> Self {
        let config = Config {
            admin_token: Some(ADMIN_TOKEN.to_string()),
            admin_email: "admin@sponsors.ae".to_string(),
            ..Config::default()
        };
        let notifier = Arc::new(RecordingNotifier::new());
        let state = AppState::new(config, Arc::new(MemoryStore::new()), notifier.clone());

        Self {
            router: create_routes(state),
            notifier,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        admin: bool,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if admin {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body), false).await
    }

    async fn admin_post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body), true).await
    }

    /// Creates and approves an event, returning its id.
    async fn approved_event(&self, requires_phone_verification: bool) -> String {
        let (status, body) = self
            .post(
                "/api/events",
                json!({
                    "title": "Abu Dhabi Motor Show",
                    "location": "ADNEC, Abu Dhabi",
                    "start_date": "2027-03-12",
                    "end_date": "2027-03-15",
                    "min_bid": "5000",
                    "max_bid": "100000",
                    "organizer_name": "Motor Events LLC",
                    "organizer_email": "hello@motorevents.ae",
                    "requires_phone_verification": requires_phone_verification
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "pending");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = self
            .admin_post(&format!("/api/admin/events/{}/approve", id), json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "approved");
        id
    }
}

fn bid_body(email: &str, phone: &str) -> Value {
    json!({
        "brand_name": "Oasis Water",
        "contact_name": "Mariam",
        "email": email,
        "phone": phone,
        "amount": 25000,
        "message": "Hydration partner for all three days"
    })
}

fn last_code(notifier: &RecordingNotifier) -> String {
    let sms = notifier
        .last_of(NotificationKind::VerificationCode)
        .expect("a verification code was sent");
    sms.body
        .split_whitespace()
        .map(|w| w.trim_end_matches('.'))
        .find(|w| w.len() == 6 && w.chars().all(|c| c.is_ascii_digit()))
        .expect("code in sms body")
        .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/health", None, false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_pending_events_are_hidden() {
    let app = TestApp::new();
    let (_, body) = app
        .post(
            "/api/events",
            json!({
                "title": "Pending Expo",
                "location": "Dubai",
                "start_date": "2027-01-10",
                "organizer_name": "Expo Co",
                "organizer_email": "expo@example.com"
            }),
        )
        .await;
    let id = body["data"]["id"].as_str().unwrap();

    let (status, body) = app.call(Method::GET, "/api/events", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = app
        .call(Method::GET, &format!("/api/events/{}", id), None, false)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_bid_is_rejected() {
    let app = TestApp::new();
    let event_id = app.approved_event(false).await;
    let uri = format!("/api/events/{}/bids", event_id);

    let (status, body) = app
        .post(&uri, bid_body("mariam@oasis.ae", "+971 55 123 4567"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["verification_required"], false);
    assert_eq!(body["data"]["bid"]["phone_verified"], false);
    assert!(body["data"]["bid"].get("verification_code").is_none());

    let (status, body) = app
        .post(&uri, bid_body("Mariam@Oasis.ae", "+971551234567"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (_, body) = app
        .call(
            Method::GET,
            &format!("/api/admin/events/{}/bids", event_id),
            None,
            true,
        )
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(app.notifier.count_kind(NotificationKind::NewBid), 1);
}

#[tokio::test]
async fn test_phone_verification_flow() {
    let app = TestApp::new();
    let event_id = app.approved_event(true).await;

    let (status, body) = app
        .post(
            &format!("/api/events/{}/bids", event_id),
            bid_body("mariam@oasis.ae", "+971551234567"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["verification_required"], true);
    let bid_id = body["data"]["bid"]["id"].as_str().unwrap().to_string();
    assert_eq!(app.notifier.count_kind(NotificationKind::NewBid), 0);

    let code = last_code(&app.notifier);
    let wrong = if code == "999999" { "000000" } else { "999999" };

    let (status, body) = app
        .post(
            "/functions/v1/verify-phone",
            json!({ "action": "verify", "bid_id": bid_id, "code": wrong }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VERIFICATION_FAILED");
    assert_eq!(app.notifier.count_kind(NotificationKind::NewBid), 0);

    let (status, body) = app
        .post(
            "/functions/v1/verify-phone",
            json!({ "action": "verify", "bid_id": bid_id, "code": code }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["phone_verified"], true);
    assert_eq!(app.notifier.count_kind(NotificationKind::NewBid), 1);

    let (_, body) = app
        .call(
            Method::GET,
            &format!("/api/admin/events/{}/bids", event_id),
            None,
            true,
        )
        .await;
    assert_eq!(body["data"][0]["phone_verified"], true);
}

#[tokio::test]
async fn test_verify_phone_resend() {
    let app = TestApp::new();
    let event_id = app.approved_event(true).await;
    let (_, body) = app
        .post(
            &format!("/api/events/{}/bids", event_id),
            bid_body("mariam@oasis.ae", "+971551234567"),
        )
        .await;
    let bid_id = body["data"]["bid"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/functions/v1/verify-phone",
            json!({ "action": "send", "bid_id": bid_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone_verified"], false);
    assert!(body["data"]["code_expires_at"].is_string());
    assert_eq!(app.notifier.count_kind(NotificationKind::VerificationCode), 2);

    let (status, body) = app
        .post(
            "/functions/v1/verify-phone",
            json!({ "action": "verify", "bid_id": bid_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = TestApp::new();

    let (status, body) = app
        .call(Method::GET, "/api/admin/events", None, false)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");

    let (status, _) = app
        .post(
            "/functions/v1/send-notification",
            json!({ "to": "a@b.com", "subject": "Hi", "message": "Hello" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.notifier.count(), 0);
}

#[tokio::test]
async fn test_function_endpoints() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/functions/v1/send-contact-form",
            json!({ "name": "Khalid", "email": "khalid@example.com", "message": "Hi there" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(app.notifier.count_kind(NotificationKind::ContactForm), 1);

    let (status, _) = app
        .admin_post(
            "/functions/v1/send-notification",
            json!({ "to": "+971 50 000 1111", "channel": "sms", "message": "Your slot is confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let sent = app.notifier.last_of(NotificationKind::Custom).unwrap();
    assert_eq!(sent.to, "+971500001111");

    let event_id = app.approved_event(false).await;
    let (status, body) = app
        .admin_post(
            "/functions/v1/send-event-approval-email",
            json!({ "event_id": event_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(app.notifier.count_kind(NotificationKind::EventApproved), 2);

    let (status, body) = app
        .admin_post(
            "/functions/v1/send-event-rejection-email",
            json!({ "event_id": event_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/functions/v1/verify-phone", json!({ "action": "verify" }))
        .await;

    assert!(status.is_client_error());
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_space_request_flow() {
    let app = TestApp::new();

    let (status, body) = app
        .admin_post(
            "/api/admin/spaces",
            json!({
                "name": "Al Qasba Hall",
                "location": "Sharjah",
                "capacity": 300,
                "price_per_day": "18000",
                "contact_email": "hall@qasba.ae"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let space_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            &format!("/api/spaces/{}/requests", space_id),
            json!({
                "requester_name": "Noura",
                "requester_email": "noura@example.com",
                "event_date": "2099-05-01",
                "guest_count": 120
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .admin_post(
            &format!("/api/admin/space-requests/{}/respond", request_id),
            json!({ "status": "approved", "admin_response": "See you there" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(
        app.notifier
            .count_kind(NotificationKind::SpaceRequestDecision),
        1
    );
}

#[tokio::test]
async fn test_verify_phone_locks_after_repeated_wrong_codes() {
    let app = TestApp::new();
    let event_id = app.approved_event(true).await;
    let (_, body) = app
        .post(
            &format!("/api/events/{}/bids", event_id),
            bid_body("mariam@oasis.ae", "+971551234567"),
        )
        .await;
    let bid_id = body["data"]["bid"]["id"].as_str().unwrap().to_string();
    let code = last_code(&app.notifier);
    let wrong = if code == "999999" { "000000" } else { "999999" };

    for _ in 0..5 {
        let (status, body) = app
            .post(
                "/functions/v1/verify-phone",
                json!({ "action": "verify", "bid_id": bid_id, "code": wrong }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VERIFICATION_FAILED");
    }

    let (status, body) = app
        .post(
            "/functions/v1/verify-phone",
            json!({ "action": "verify", "bid_id": bid_id, "code": code }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VERIFICATION_FAILED");
    assert_eq!(app.notifier.count_kind(NotificationKind::NewBid), 0);
}
