//! Row types for the Postgres backend.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{locations, reservations, slots, users};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{Location, Reservation, Role, Slot, SlotStatus, User};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> RepositoryResult<Self> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| RepositoryError::internal(e))?;
        Ok(User {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LocationRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = locations)]
pub struct NewLocationRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: row.id.into(),
            name: row.name,
            address: row.address,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SlotRow {
    pub id: Uuid,
    pub identifier: String,
    pub status: String,
    pub location_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = slots)]
pub struct NewSlotRow {
    pub id: Uuid,
    pub identifier: String,
    pub status: String,
    pub location_id: Uuid,
}

impl TryFrom<SlotRow> for Slot {
    type Error = RepositoryError;

    fn try_from(row: SlotRow) -> RepositoryResult<Self> {
        let status: SlotStatus = row
            .status
            .parse()
            .map_err(|e: String| RepositoryError::internal(e))?;
        Ok(Slot {
            id: row.id.into(),
            identifier: row.identifier,
            status,
            location_id: row.location_id.into(),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub canceled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub canceled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: row.id.into(),
            user_id: row.user_id.into(),
            slot_id: row.slot_id.into(),
            start_time: row.start_time,
            end_time: row.end_time,
            canceled: row.canceled,
            created_at: row.created_at,
        }
    }
}
