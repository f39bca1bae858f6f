//! Storage layer for the parking reservation service.
//!
//! The module follows the repository pattern so backends can be swapped:
//!
//! - `repository`: trait definitions and the repository error type
//! - `repositories::local`: in-memory implementation for tests and local
//!   development
//! - `repositories::postgres`: Diesel/Postgres implementation (behind the
//!   `postgres-repo` feature)
//! - `factory`: builds a boxed `Arc<dyn FullRepository>` from env or config
//! - `repo_config`: `repository.toml` support
//!
//! There is deliberately no process-wide repository singleton: the handle
//! returned by the factory is threaded through application state and
//! function parameters, which keeps test doubles cheap and mutation visible.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, FullRepository, HealthRepository, LocationRepository, RepositoryError,
    RepositoryResult, ReservationRepository, SlotRepository, UserRepository,
};
