//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Authentication is expressed in the
//! signatures: handlers taking [`AuthUser`] require a signed-in caller,
//! handlers taking [`AdminUser`] require an administrator.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::dto::{
    AuthResponse, CreateLocationRequest, CreateSlotRequest, HealthResponse, LocationListResponse,
    LocationResponse, LocationSlotsResponse, MessageResponse, ReservationListResponse,
    ReservationResponse, ReservationRequest, SigninRequest, SignupRequest, SlotListResponse,
    SlotResponse, UpdateLocationRequest, UpdateSlotRequest,
};
use super::error::AppError;
use super::extract::{AdminUser, AuthUser};
use super::state::AppState;
use crate::db::repository::HealthRepository;
use crate::services::{accounts, admission, catalog};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_id<T: From<Uuid>>(raw: &str, entity: &str) -> Result<T, AppError> {
    raw.parse::<Uuid>()
        .map(T::from)
        .map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Auth
// =============================================================================

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let session = accounts::register(&state.repository, &state.auth, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            data: session,
        }),
    ))
}

/// POST /auth/signin
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> HandlerResult<AuthResponse> {
    let session = accounts::login(&state.repository, &state.auth, request).await?;
    Ok(Json(AuthResponse {
        success: true,
        data: session,
    }))
}

/// POST /auth/signout
///
/// Tokens are stateless; signing out is client-side disposal.
pub async fn signout() -> HandlerResult<MessageResponse> {
    Ok(Json(MessageResponse {
        success: true,
        message: "logged out (token expired on client)".to_string(),
    }))
}

// =============================================================================
// Locations
// =============================================================================

/// GET /locations
pub async fn list_locations(State(state): State<AppState>) -> HandlerResult<LocationListResponse> {
    let locations = catalog::list_locations(&state.repository).await?;
    Ok(Json(LocationListResponse { locations }))
}

/// POST /locations (admin)
pub async fn create_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<LocationResponse>), AppError> {
    let location = catalog::create_location(&state.repository, request).await?;
    Ok((StatusCode::CREATED, Json(LocationResponse { location })))
}

/// PATCH /locations/{id} (admin)
pub async fn update_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateLocationRequest>,
) -> HandlerResult<LocationResponse> {
    let id = parse_id(&id, "location")?;
    let location = catalog::update_location(&state.repository, id, request).await?;
    Ok(Json(LocationResponse { location }))
}

/// DELETE /locations/{id} (admin)
pub async fn delete_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "location")?;
    catalog::delete_location(&state.repository, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Slots
// =============================================================================

/// GET /slots
pub async fn list_slots(State(state): State<AppState>) -> HandlerResult<SlotListResponse> {
    let slots = catalog::list_slots(&state.repository).await?;
    Ok(Json(SlotListResponse { slots }))
}

/// GET /locations/{id}/slots
pub async fn list_location_slots(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<LocationSlotsResponse> {
    let id = parse_id(&id, "location")?;
    let slots = catalog::list_slots_by_location(&state.repository, id).await?;
    Ok(Json(LocationSlotsResponse { slots }))
}

/// POST /slots (admin)
pub async fn create_slot(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<SlotResponse>), AppError> {
    let slot = catalog::create_slot(&state.repository, request).await?;
    Ok((StatusCode::CREATED, Json(SlotResponse { slot })))
}

/// PATCH /slots/{id} (admin)
pub async fn update_slot(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateSlotRequest>,
) -> HandlerResult<SlotResponse> {
    let id = parse_id(&id, "slot")?;
    let slot = catalog::update_slot(&state.repository, id, request).await?;
    Ok(Json(SlotResponse { slot }))
}

/// DELETE /slots/{id} (admin)
pub async fn delete_slot(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "slot")?;
    catalog::delete_slot(&state.repository, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Reservations
// =============================================================================

/// POST /reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let reservation =
        admission::admit_reservation(&state.repository, &state.notifier, user.id, request)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse { reservation }),
    ))
}

/// GET /reservations (admin)
pub async fn all_reservations(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> HandlerResult<ReservationListResponse> {
    let reservations = admission::list_all_reservations(&state.repository).await?;
    Ok(Json(ReservationListResponse { reservations }))
}

/// GET /reservations/me
pub async fn my_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> HandlerResult<ReservationListResponse> {
    let reservations =
        admission::list_reservations_for_user(&state.repository, user.id).await?;
    Ok(Json(ReservationListResponse { reservations }))
}

/// DELETE /reservations/{id}
///
/// Cancels the reservation (owner only); the record is kept as history.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> HandlerResult<ReservationResponse> {
    let id = parse_id(&id, "reservation")?;
    let reservation = admission::cancel_reservation(&state.repository, user.id, id).await?;
    Ok(Json(ReservationResponse { reservation }))
}
