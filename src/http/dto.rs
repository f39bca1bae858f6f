//! Data Transfer Objects for the HTTP API.
//!
//! Request payloads live next to the services that validate them and are
//! re-exported here; this module adds the response wrappers.

use serde::{Deserialize, Serialize};

pub use crate::services::{
    AuthSession, CreateLocationRequest, CreateSlotRequest, ReservationRequest, SigninRequest,
    SignupRequest, UpdateLocationRequest, UpdateSlotRequest,
};

use crate::models::{
    Location, LocationWithSlots, Reservation, ReservationDetail, Slot, SlotWithLocation,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store connection status
    pub database: String,
}

/// Body for auth endpoints: `{"success": true, "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub data: AuthSession,
}

/// Plain acknowledgment body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationListResponse {
    pub locations: Vec<LocationWithSlots>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub slot: Slot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub slots: Vec<SlotWithLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSlotsResponse {
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub reservation: Reservation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<ReservationDetail>,
}
