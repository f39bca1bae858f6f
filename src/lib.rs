//! # Parkade Rust Backend
//!
//! REST API for a parking-reservation service: users register and sign in,
//! browse parking locations and slots, and reserve a slot for a time
//! window; administrators manage locations and slots and can view every
//! reservation.
//!
//! The interesting part is reservation admission: a requested time window
//! is validated, then checked against the slot's state and the slot's
//! active bookings, and the overlap check plus insert run as one atomic
//! unit per slot, so a slot can never be double-booked even under
//! concurrent requests.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: domain entities and the half-open reservation window
//! - [`db`]: repository pattern and persistence backends (in-memory and
//!   Postgres)
//! - [`auth`]: session tokens and password hashing
//! - [`services`]: business logic, with the admission engine at the center
//! - [`http`]: axum-based HTTP server and request handlers

pub mod auth;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
