//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use parkade_rust::auth::{self, AuthConfig};
use parkade_rust::db::repository::{
    FullRepository, LocationRepository, SlotRepository, UserRepository,
};
use parkade_rust::db::RepositoryFactory;
use parkade_rust::http::{create_router, AppState};
use parkade_rust::models::{
    Location, NewLocation, NewSlot, NewUser, Role, Slot, SlotId, SlotStatus, User,
};
use parkade_rust::services::{LogNotifier, ReservationRequest};

pub const TEST_PASSWORD: &str = "password123";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        secret: "test-secret".to_string(),
        token_ttl_hours: 1,
    }
}

pub fn local_repository() -> Arc<dyn FullRepository> {
    RepositoryFactory::create_local()
}

pub fn test_state() -> AppState {
    AppState::new(local_repository(), auth_config(), Arc::new(LogNotifier))
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (create_router(state.clone()), state)
}

/// Create a user directly in the store and mint a token for them.
pub async fn seed_user(
    repo: &Arc<dyn FullRepository>,
    name: &str,
    email: &str,
    role: Role,
) -> (User, String) {
    let user = repo
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: auth::hash_password(TEST_PASSWORD).unwrap(),
            role,
        })
        .await
        .unwrap();
    let token = auth::issue_token(&auth_config(), &user).unwrap();
    (user, token)
}

/// Create a location with one slot in the given status.
pub async fn seed_slot(
    repo: &Arc<dyn FullRepository>,
    identifier: &str,
    status: SlotStatus,
) -> (Location, Slot) {
    let location = repo
        .create_location(NewLocation {
            name: format!("Lot {}", identifier),
            address: "1 Main St".to_string(),
        })
        .await
        .unwrap();
    let slot = repo
        .create_slot(NewSlot {
            identifier: identifier.to_string(),
            status,
            location_id: location.id,
        })
        .await
        .unwrap();
    (location, slot)
}

pub fn hours_from_now(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}

pub fn reservation_request(
    slot_id: SlotId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ReservationRequest {
    ReservationRequest {
        slot_id: Some(slot_id.to_string()),
        start_time: Some(start.to_rfc3339()),
        end_time: Some(end.to_rfc3339()),
    }
}

/// Fire one request at the router and decode the JSON response.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
