//! Route-level tests driving the full axum router.

mod support;

use axum::http::StatusCode;
use parkade_rust::models::{Role, SlotStatus};
use serde_json::json;

use support::*;

#[tokio::test]
async fn health_endpoint_reports_connected() {
    let (app, _) = test_app();
    let (status, body) = send_json(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn signup_then_signin() {
    let (app, _) = test_app();

    let payload = json!({
        "name": "Ana",
        "email": "ana@example.com",
        "password": "password123",
    });
    let (status, body) = send_json(&app, "POST", "/auth/signup", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["role"], "USER");

    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/signin",
        None,
        Some(json!({"email": "ana@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let (app, _) = test_app();
    let payload = json!({
        "name": "Ana",
        "email": "ana@example.com",
        "password": "password123",
    });
    let (status, _) = send_json(&app, "POST", "/auth/signup", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&app, "POST", "/auth/signup", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn signup_with_missing_fields_is_rejected() {
    let (app, _) = test_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({"email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, state) = test_app();
    seed_user(&state.repository, "Ana", "ana@example.com", Role::User).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/signin",
        None,
        Some(json!({"email": "ana@example.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn admin_mutations_are_gated() {
    let (app, state) = test_app();
    let (_, user_token) = seed_user(&state.repository, "Ana", "ana@example.com", Role::User).await;
    let (_, admin_token) =
        seed_user(&state.repository, "Root", "admin@example.com", Role::Admin).await;

    let payload = json!({"name": "Central Garage", "address": "1 Main St"});

    let (status, _) = send_json(&app, "POST", "/locations", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "POST",
        "/locations",
        Some(&user_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_json(
        &app,
        "POST",
        "/locations",
        Some(&admin_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["location"]["name"], "Central Garage");
}

#[tokio::test]
async fn location_crud_round_trip() {
    let (app, state) = test_app();
    let (_, admin_token) =
        seed_user(&state.repository, "Root", "admin@example.com", Role::Admin).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/locations",
        Some(&admin_token),
        Some(json!({"name": "Central Garage", "address": "1 Main St"})),
    )
    .await;
    let id = body["location"]["id"].as_str().unwrap().to_string();

    // Public listing includes slots.
    let (status, body) = send_json(&app, "GET", "/locations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locations"].as_array().unwrap().len(), 1);
    assert!(body["locations"][0]["slots"].as_array().unwrap().is_empty());

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/locations/{}", id),
        Some(&admin_token),
        Some(json!({"address": "2 Side St"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"]["address"], "2 Side St");
    assert_eq!(body["location"]["name"], "Central Garage");

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/locations/{}", id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/locations/{}", id),
        Some(&admin_token),
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slot_identifier_unique_per_location_only() {
    let (app, state) = test_app();
    let (_, admin_token) =
        seed_user(&state.repository, "Root", "admin@example.com", Role::Admin).await;

    let mut location_ids = Vec::new();
    for name in ["North Lot", "South Lot"] {
        let (_, body) = send_json(
            &app,
            "POST",
            "/locations",
            Some(&admin_token),
            Some(json!({"name": name, "address": "1 Main St"})),
        )
        .await;
        location_ids.push(body["location"]["id"].as_str().unwrap().to_string());
    }

    let (status, _) = send_json(
        &app,
        "POST",
        "/slots",
        Some(&admin_token),
        Some(json!({"identifier": "A-1", "locationId": location_ids[0]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same identifier at the same location conflicts.
    let (status, body) = send_json(
        &app,
        "POST",
        "/slots",
        Some(&admin_token),
        Some(json!({"identifier": "A-1", "locationId": location_ids[0]})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // Same identifier at a different location is fine.
    let (status, _) = send_json(
        &app,
        "POST",
        "/slots",
        Some(&admin_token),
        Some(json!({"identifier": "A-1", "locationId": location_ids[1]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn slot_creation_requires_existing_location() {
    let (app, state) = test_app();
    let (_, admin_token) =
        seed_user(&state.repository, "Root", "admin@example.com", Role::Admin).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/slots",
        Some(&admin_token),
        Some(json!({
            "identifier": "A-1",
            "locationId": uuid::Uuid::new_v4().to_string(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reservation_flow_over_http() {
    let (app, state) = test_app();
    let (_, token) = seed_user(&state.repository, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&state.repository, "A-1", SlotStatus::Available).await;

    let payload = json!({
        "slotId": slot.id.to_string(),
        "startTime": hours_from_now(1).to_rfc3339(),
        "endTime": hours_from_now(2).to_rfc3339(),
    });

    // No token, no booking.
    let (status, _) = send_json(&app, "POST", "/reservations", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) =
        send_json(&app, "POST", "/reservations", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reservation"]["canceled"], false);

    // The identical window is now taken.
    let (status, body) =
        send_json(&app, "POST", "/reservations", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn reservation_validation_over_http() {
    let (app, state) = test_app();
    let (_, token) = seed_user(&state.repository, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&state.repository, "A-1", SlotStatus::Available).await;

    // Past start time.
    let (status, _) = send_json(
        &app,
        "POST",
        "/reservations",
        Some(&token),
        Some(json!({
            "slotId": slot.id.to_string(),
            "startTime": hours_from_now(-1).to_rfc3339(),
            "endTime": hours_from_now(2).to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing fields.
    let (status, _) = send_json(
        &app,
        "POST",
        "/reservations",
        Some(&token),
        Some(json!({"slotId": slot.id.to_string()})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unavailable_slot_conflicts_over_http() {
    let (app, state) = test_app();
    let (_, token) = seed_user(&state.repository, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&state.repository, "A-1", SlotStatus::Unavailable).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/reservations",
        Some(&token),
        Some(json!({
            "slotId": slot.id.to_string(),
            "startTime": hours_from_now(1).to_rfc3339(),
            "endTime": hours_from_now(2).to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn listing_permissions_and_order() {
    let (app, state) = test_app();
    let (_, token) = seed_user(&state.repository, "Ana", "ana@example.com", Role::User).await;
    let (_, admin_token) =
        seed_user(&state.repository, "Root", "admin@example.com", Role::Admin).await;
    let (_, slot) = seed_slot(&state.repository, "A-1", SlotStatus::Available).await;

    // Booked out of order; /reservations/me must sort by start time.
    for (start, end) in [(4, 5), (1, 2)] {
        let (status, _) = send_json(
            &app,
            "POST",
            "/reservations",
            Some(&token),
            Some(json!({
                "slotId": slot.id.to_string(),
                "startTime": hours_from_now(start).to_rfc3339(),
                "endTime": hours_from_now(end).to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send_json(&app, "GET", "/reservations/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let mine = body["reservations"].as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine[0]["startTime"].as_str().unwrap() < mine[1]["startTime"].as_str().unwrap());

    // The global listing is admins only.
    let (status, _) = send_json(&app, "GET", "/reservations", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_json(&app, "GET", "/reservations", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let all = body["reservations"].as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["user"]["email"], "ana@example.com");
    assert_eq!(all[0]["location"]["name"], "Lot A-1");
}

#[tokio::test]
async fn cancellation_over_http() {
    let (app, state) = test_app();
    let (_, owner_token) = seed_user(&state.repository, "Ana", "ana@example.com", Role::User).await;
    let (_, other_token) = seed_user(&state.repository, "Bob", "bob@example.com", Role::User).await;
    let (_, slot) = seed_slot(&state.repository, "A-1", SlotStatus::Available).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/reservations",
        Some(&owner_token),
        Some(json!({
            "slotId": slot.id.to_string(),
            "startTime": hours_from_now(1).to_rfc3339(),
            "endTime": hours_from_now(2).to_rfc3339(),
        })),
    )
    .await;
    let id = body["reservation"]["id"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/reservations/{}", id),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_json(
        &app,
        "DELETE",
        &format!("/reservations/{}", id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reservation"]["canceled"], true);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/reservations/{}", uuid::Uuid::new_v4()),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
