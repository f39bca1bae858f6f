//! Repository trait definitions.
//!
//! Each entity gets its own trait; [`FullRepository`] is the combination a
//! backend must satisfy to drive the whole service. Handlers and services
//! only ever see `Arc<dyn FullRepository>`, so backends can be swapped
//! freely (in-memory for tests, Postgres in production).

mod catalog;
mod error;
mod reservations;
mod users;

use async_trait::async_trait;

pub use catalog::{LocationRepository, SlotRepository};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use reservations::ReservationRepository;
pub use users::UserRepository;

/// Liveness probe shared by every backend.
#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// The complete store interface the service runs against.
pub trait FullRepository:
    HealthRepository + UserRepository + LocationRepository + SlotRepository + ReservationRepository
{
}

impl<T> FullRepository for T where
    T: HealthRepository
        + UserRepository
        + LocationRepository
        + SlotRepository
        + ReservationRepository
{
}
