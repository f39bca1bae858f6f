//! Reservation model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Location, ReservationId, Slot, SlotId, TimeWindow, UserId, UserPublic};

/// A booking of one slot for one half-open time window.
///
/// Invariant: for any slot, active (non-canceled) reservations never have
/// overlapping windows. Records are only ever mutated by flipping
/// `canceled`; canceled rows stay around as history and drop out of the
/// overlap check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub canceled: bool,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// The booked window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether this reservation still occupies its window.
    pub fn is_active(&self) -> bool {
        !self.canceled
    }
}

/// Payload for persisting a new reservation; only the admission engine
/// builds these.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub window: TimeWindow,
}

/// Reservation joined with its user and slot → location for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub user: UserPublic,
    pub slot: Slot,
    pub location: Location,
}
