//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//! - Admission runs in a SERIALIZABLE transaction, so the slot-state check,
//!   the overlap check and the insert commit as one unit; the losing side
//!   of a race fails with a serialization error, is retried, and then sees
//!   the winner's row as an ordinary conflict
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::task;
use uuid::Uuid;

use crate::db::repository::{
    ErrorContext, HealthRepository, LocationRepository, RepositoryError, RepositoryResult,
    ReservationRepository, SlotRepository, UserRepository,
};
use crate::models::{
    Location, LocationId, LocationWithSlots, NewLocation, NewReservation, NewSlot, NewUser,
    Reservation, ReservationDetail, ReservationId, Slot, SlotId, SlotStatus, SlotWithLocation,
    UpdateLocation, UpdateSlot, User, UserId,
};

mod models;
mod schema;

use models::*;
use schema::{locations, reservations, slots, users};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let parse_var = |name: &str| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
        };

        Ok(Self {
            database_url,
            max_pool_size: parse_var("PG_POOL_MAX").unwrap_or(10) as u32,
            min_pool_size: parse_var("PG_POOL_MIN").unwrap_or(1) as u32,
            connection_timeout_sec: parse_var("PG_CONN_TIMEOUT_SEC").unwrap_or(30),
            idle_timeout_sec: parse_var("PG_IDLE_TIMEOUT_SEC").unwrap_or(600),
            max_retries: parse_var("PG_MAX_RETRIES").unwrap_or(3) as u32,
            retry_delay_ms: parse_var("PG_RETRY_DELAY_MS").unwrap_or(100),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool, config })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient
    /// failures (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn location_exists(conn: &mut PgConnection, id: Uuid) -> RepositoryResult<bool> {
    let count: i64 = locations::table
        .filter(locations::id.eq(id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

fn rewrap_unique_violation(err: RepositoryError, message: &str) -> RepositoryError {
    match err {
        RepositoryError::Conflict { .. } => RepositoryError::conflict(message),
        other => other,
    }
}

#[async_trait]
impl HealthRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        self.with_conn(move |conn| {
            let row = NewUserRow {
                id: UserId::new().value(),
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                password_hash: new_user.password_hash.clone(),
                role: new_user.role.to_string(),
                created_at: Utc::now(),
            };
            let stored: UserRow = diesel::insert_into(users::table)
                .values(&row)
                .get_result(conn)
                .map_err(|e| rewrap_unique_violation(e.into(), "user already exists"))?;
            stored.try_into()
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.with_conn(move |conn| {
            let row: Option<UserRow> = users::table
                .find(id.value())
                .first(conn)
                .optional()?;
            row.map(User::try_from).transpose()
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            let row: Option<UserRow> = users::table
                .filter(users::email.eq(&email))
                .first(conn)
                .optional()?;
            row.map(User::try_from).transpose()
        })
        .await
    }
}

#[async_trait]
impl LocationRepository for PostgresRepository {
    async fn create_location(&self, new_location: NewLocation) -> RepositoryResult<Location> {
        self.with_conn(move |conn| {
            let row = NewLocationRow {
                id: LocationId::new().value(),
                name: new_location.name.clone(),
                address: new_location.address.clone(),
            };
            let stored: LocationRow = diesel::insert_into(locations::table)
                .values(&row)
                .get_result(conn)?;
            Ok(stored.into())
        })
        .await
    }

    async fn list_locations(&self) -> RepositoryResult<Vec<LocationWithSlots>> {
        self.with_conn(|conn| {
            let location_rows: Vec<LocationRow> =
                locations::table.order(locations::name.asc()).load(conn)?;
            let slot_rows: Vec<SlotRow> =
                slots::table.order(slots::identifier.asc()).load(conn)?;

            let mut by_location: HashMap<Uuid, Vec<Slot>> = HashMap::new();
            for row in slot_rows {
                let location_id = row.location_id;
                by_location
                    .entry(location_id)
                    .or_default()
                    .push(row.try_into()?);
            }

            Ok(location_rows
                .into_iter()
                .map(|row| {
                    let slots = by_location.remove(&row.id).unwrap_or_default();
                    LocationWithSlots {
                        location: row.into(),
                        slots,
                    }
                })
                .collect())
        })
        .await
    }

    async fn find_location(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        self.with_conn(move |conn| {
            let row: Option<LocationRow> = locations::table
                .find(id.value())
                .first(conn)
                .optional()?;
            Ok(row.map(Location::from))
        })
        .await
    }

    async fn update_location(
        &self,
        id: LocationId,
        update: UpdateLocation,
    ) -> RepositoryResult<Location> {
        self.with_conn(move |conn| {
            conn.transaction::<Location, RepositoryError, _>(|conn| {
                let current: LocationRow = locations::table
                    .find(id.value())
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| RepositoryError::not_found("location not found"))?;

                let name = update.name.clone().unwrap_or(current.name);
                let address = update.address.clone().unwrap_or(current.address);

                let updated: LocationRow = diesel::update(locations::table.find(id.value()))
                    .set((locations::name.eq(name), locations::address.eq(address)))
                    .get_result(conn)?;
                Ok(updated.into())
            })
        })
        .await
    }

    async fn delete_location(&self, id: LocationId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted =
                diesel::delete(locations::table.find(id.value())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found("location not found"));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SlotRepository for PostgresRepository {
    async fn create_slot(&self, new_slot: NewSlot) -> RepositoryResult<Slot> {
        self.with_conn(move |conn| {
            conn.transaction::<Slot, RepositoryError, _>(|conn| {
                if !location_exists(conn, new_slot.location_id.value())? {
                    return Err(RepositoryError::not_found("location not found"));
                }

                let row = NewSlotRow {
                    id: SlotId::new().value(),
                    identifier: new_slot.identifier.clone(),
                    status: new_slot.status.to_string(),
                    location_id: new_slot.location_id.value(),
                };
                let stored: SlotRow = diesel::insert_into(slots::table)
                    .values(&row)
                    .get_result(conn)
                    .map_err(|e| {
                        rewrap_unique_violation(
                            e.into(),
                            "slot with this identifier already exists at this location",
                        )
                    })?;
                stored.try_into()
            })
        })
        .await
    }

    async fn list_slots(&self) -> RepositoryResult<Vec<SlotWithLocation>> {
        self.with_conn(|conn| {
            let rows: Vec<(SlotRow, LocationRow)> = slots::table
                .inner_join(locations::table)
                .order(slots::identifier.asc())
                .select((SlotRow::as_select(), LocationRow::as_select()))
                .load(conn)?;

            rows.into_iter()
                .map(|(slot, location)| {
                    Ok(SlotWithLocation {
                        slot: slot.try_into()?,
                        location: location.into(),
                    })
                })
                .collect()
        })
        .await
    }

    async fn list_slots_by_location(
        &self,
        location_id: LocationId,
    ) -> RepositoryResult<Vec<Slot>> {
        self.with_conn(move |conn| {
            if !location_exists(conn, location_id.value())? {
                return Err(RepositoryError::not_found("location not found"));
            }
            let rows: Vec<SlotRow> = slots::table
                .filter(slots::location_id.eq(location_id.value()))
                .order(slots::identifier.asc())
                .load(conn)?;
            rows.into_iter().map(Slot::try_from).collect()
        })
        .await
    }

    async fn find_slot(&self, id: SlotId) -> RepositoryResult<Option<Slot>> {
        self.with_conn(move |conn| {
            let row: Option<SlotRow> = slots::table.find(id.value()).first(conn).optional()?;
            row.map(Slot::try_from).transpose()
        })
        .await
    }

    async fn update_slot(&self, id: SlotId, update: UpdateSlot) -> RepositoryResult<Slot> {
        self.with_conn(move |conn| {
            conn.transaction::<Slot, RepositoryError, _>(|conn| {
                let current: SlotRow = slots::table
                    .find(id.value())
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| RepositoryError::not_found("slot not found"))?;

                let identifier = update.identifier.clone().unwrap_or(current.identifier);
                let status = update
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or(current.status);
                let location_id = update
                    .location_id
                    .map(|l| l.value())
                    .unwrap_or(current.location_id);

                if !location_exists(conn, location_id)? {
                    return Err(RepositoryError::not_found("location not found"));
                }

                let updated: SlotRow = diesel::update(slots::table.find(id.value()))
                    .set((
                        slots::identifier.eq(identifier),
                        slots::status.eq(status),
                        slots::location_id.eq(location_id),
                    ))
                    .get_result(conn)
                    .map_err(|e| {
                        rewrap_unique_violation(
                            e.into(),
                            "slot with this identifier already exists at this location",
                        )
                    })?;
                updated.try_into()
            })
        })
        .await
    }

    async fn delete_slot(&self, id: SlotId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(slots::table.find(id.value())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found("slot not found"));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ReservationRepository for PostgresRepository {
    async fn admit_reservation(&self, new: NewReservation) -> RepositoryResult<Reservation> {
        self.with_conn(move |conn| {
            // SERIALIZABLE makes the slot check, overlap check and insert
            // commit atomically; concurrent admissions for the same slot
            // either serialize cleanly or fail with a retryable
            // serialization error, after which the re-run sees the winner.
            conn.build_transaction()
                .serializable()
                .run(|conn| {
                    let slot: SlotRow = slots::table
                        .find(new.slot_id.value())
                        .first(conn)
                        .optional()?
                        .ok_or_else(|| RepositoryError::not_found("slot not found"))?;

                    if slot.status != SlotStatus::Available.as_str() {
                        return Err(RepositoryError::conflict("slot is not available"));
                    }

                    let overlapping: i64 = reservations::table
                        .filter(reservations::slot_id.eq(new.slot_id.value()))
                        .filter(reservations::canceled.eq(false))
                        .filter(reservations::start_time.lt(new.window.end))
                        .filter(reservations::end_time.gt(new.window.start))
                        .count()
                        .get_result(conn)?;
                    if overlapping > 0 {
                        return Err(RepositoryError::conflict("time slot already booked"));
                    }

                    let row = NewReservationRow {
                        id: ReservationId::new().value(),
                        user_id: new.user_id.value(),
                        slot_id: new.slot_id.value(),
                        start_time: new.window.start,
                        end_time: new.window.end,
                        canceled: false,
                        created_at: Utc::now(),
                    };
                    let stored: ReservationRow = diesel::insert_into(reservations::table)
                        .values(&row)
                        .get_result(conn)?;
                    Ok(stored.into())
                })
        })
        .await
    }

    async fn find_reservation(
        &self,
        id: ReservationId,
    ) -> RepositoryResult<Option<Reservation>> {
        self.with_conn(move |conn| {
            let row: Option<ReservationRow> = reservations::table
                .find(id.value())
                .first(conn)
                .optional()?;
            Ok(row.map(Reservation::from))
        })
        .await
    }

    async fn cancel_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation> {
        self.with_conn(move |conn| {
            let updated: Option<ReservationRow> =
                diesel::update(reservations::table.find(id.value()))
                    .set(reservations::canceled.eq(true))
                    .get_result(conn)
                    .optional()?;
            updated
                .map(Reservation::from)
                .ok_or_else(|| RepositoryError::not_found("reservation not found"))
        })
        .await
    }

    async fn list_reservations_detailed(&self) -> RepositoryResult<Vec<ReservationDetail>> {
        self.with_conn(|conn| {
            let rows: Vec<(ReservationRow, UserRow, SlotRow, LocationRow)> =
                reservations::table
                    .inner_join(users::table)
                    .inner_join(slots::table.inner_join(locations::table))
                    .order(reservations::created_at.desc())
                    .select((
                        ReservationRow::as_select(),
                        UserRow::as_select(),
                        SlotRow::as_select(),
                        LocationRow::as_select(),
                    ))
                    .load(conn)?;

            rows.into_iter()
                .map(|(reservation, user, slot, location)| {
                    Ok(ReservationDetail {
                        reservation: reservation.into(),
                        user: User::try_from(user)?.public(),
                        slot: slot.try_into()?,
                        location: location.into(),
                    })
                })
                .collect()
        })
        .await
    }

    async fn list_reservations_for_user(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<ReservationDetail>> {
        self.with_conn(move |conn| {
            let rows: Vec<(ReservationRow, UserRow, SlotRow, LocationRow)> =
                reservations::table
                    .inner_join(users::table)
                    .inner_join(slots::table.inner_join(locations::table))
                    .filter(reservations::user_id.eq(user_id.value()))
                    .order(reservations::start_time.asc())
                    .select((
                        ReservationRow::as_select(),
                        UserRow::as_select(),
                        SlotRow::as_select(),
                        LocationRow::as_select(),
                    ))
                    .load(conn)?;

            rows.into_iter()
                .map(|(reservation, user, slot, location)| {
                    Ok(ReservationDetail {
                        reservation: reservation.into(),
                        user: User::try_from(user)?.public(),
                        slot: slot.try_into()?,
                        location: location.into(),
                    })
                })
                .collect()
        })
        .await
    }

    async fn list_active_reservations_for_slot(
        &self,
        slot_id: SlotId,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.with_conn(move |conn| {
            let rows: Vec<ReservationRow> = reservations::table
                .filter(reservations::slot_id.eq(slot_id.value()))
                .filter(reservations::canceled.eq(false))
                .order(reservations::start_time.asc())
                .load(conn)?;
            Ok(rows.into_iter().map(Reservation::from).collect())
        })
        .await
    }
}
