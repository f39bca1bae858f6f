//! Axum-based HTTP server layer.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{AppError, ErrorBody};
pub use extract::{AdminUser, AuthUser};
pub use router::create_router;
pub use state::AppState;
