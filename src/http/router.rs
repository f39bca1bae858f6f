//! Router configuration for the HTTP API.
//!
//! This module sets up all routes and middleware (CORS, compression,
//! tracing) and creates the axum router ready for serving. Authorization is
//! carried by the handler signatures (see [`super::extract`]), so public and
//! protected methods can share a path.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Accounts
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/signin", post(handlers::signin))
        .route("/auth/signout", post(handlers::signout))
        // Locations: public read, admin mutation
        .route(
            "/locations",
            get(handlers::list_locations).post(handlers::create_location),
        )
        .route(
            "/locations/{id}",
            patch(handlers::update_location).delete(handlers::delete_location),
        )
        .route("/locations/{id}/slots", get(handlers::list_location_slots))
        // Slots: public read, admin mutation
        .route(
            "/slots",
            get(handlers::list_slots).post(handlers::create_slot),
        )
        .route(
            "/slots/{id}",
            patch(handlers::update_slot).delete(handlers::delete_slot),
        )
        // Reservations
        .route(
            "/reservations",
            get(handlers::all_reservations).post(handlers::create_reservation),
        )
        .route("/reservations/me", get(handlers::my_reservations))
        .route("/reservations/{id}", delete(handlers::cancel_reservation))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
