//! Reservation admission engine.
//!
//! This is the heart of the service: it validates a requested booking
//! against the time-window rules, then hands the slot-state and overlap
//! checks to the store, which runs them atomically with the insert. The
//! validation order is fixed and short-circuits on the first failure:
//!
//! 1. required fields present
//! 2. times parse as RFC 3339
//! 3. start lies strictly in the future
//! 4. start < end (half-open window)
//! 5. slot exists and is `Available`
//! 6. no active reservation on the slot overlaps the window
//! 7. persist, dispatch the confirmation e-mail, return the record
//!
//! Steps 5-7 are one atomic unit inside the repository, so of two racing
//! requests for overlapping windows exactly one commits and the other
//! surfaces here as a conflict.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::notifier::{dispatch_confirmation, ReservationNotifier};
use crate::db::repository::{FullRepository, ReservationRepository, UserRepository};
use crate::models::{
    NewReservation, Reservation, ReservationDetail, ReservationId, SlotId, TimeWindow, UserId,
};

/// Incoming reservation request, fields as supplied by the client.
///
/// Everything is optional at this level; presence is the engine's first
/// validation step, not the deserializer's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationRequest {
    pub slot_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

fn parse_instant(raw: &str) -> ServiceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ServiceError::Validation("invalid start or end time".to_string()))
}

/// Admit a reservation for `requester`, or explain why not.
pub async fn admit_reservation(
    repo: &Arc<dyn FullRepository>,
    notifier: &Arc<dyn ReservationNotifier>,
    requester: UserId,
    request: ReservationRequest,
) -> ServiceResult<Reservation> {
    let (slot_raw, start_raw, end_raw) = match (
        request.slot_id.as_deref(),
        request.start_time.as_deref(),
        request.end_time.as_deref(),
    ) {
        (Some(slot), Some(start), Some(end))
            if !slot.is_empty() && !start.is_empty() && !end.is_empty() =>
        {
            (slot, start, end)
        }
        _ => {
            warn!("Reservation rejected: missing fields");
            return Err(ServiceError::Validation(
                "slotId, startTime and endTime are required".to_string(),
            ));
        }
    };

    let slot_id = slot_raw
        .parse::<Uuid>()
        .map(SlotId::from)
        .map_err(|_| ServiceError::Validation("invalid slot id".to_string()))?;
    let start = parse_instant(start_raw)?;
    let end = parse_instant(end_raw)?;

    if start <= Utc::now() {
        warn!("Reservation rejected: start time not in the future");
        return Err(ServiceError::Validation(
            "cannot reserve a slot in the past".to_string(),
        ));
    }

    let window = TimeWindow::new(start, end)
        .ok_or_else(|| ServiceError::Validation("invalid time range".to_string()))?;

    // Slot-state check, overlap check and insert run atomically in the store.
    let reservation = repo
        .admit_reservation(NewReservation {
            user_id: requester,
            slot_id,
            window,
        })
        .await?;

    info!(
        "Reservation {} created by user {} for slot {}",
        reservation.id, requester, slot_id
    );

    // Confirmation delivery is best-effort and never blocks the response.
    match repo.find_user(requester).await {
        Ok(Some(user)) => {
            dispatch_confirmation(Arc::clone(notifier), user.email, reservation.id)
        }
        Ok(None) => warn!("Reservation {} has no user to notify", reservation.id),
        Err(e) => warn!("Skipping confirmation for {}: {}", reservation.id, e),
    }

    Ok(reservation)
}

/// Cancel a reservation owned by `requester`.
///
/// Cancelling an already-canceled reservation succeeds and returns the
/// record unchanged; nothing observable distinguishes the two.
pub async fn cancel_reservation(
    repo: &Arc<dyn FullRepository>,
    requester: UserId,
    reservation_id: ReservationId,
) -> ServiceResult<Reservation> {
    let reservation = repo
        .find_reservation(reservation_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("reservation not found".to_string()))?;

    if reservation.user_id != requester {
        warn!(
            "User {} tried to cancel reservation {} they do not own",
            requester, reservation_id
        );
        return Err(ServiceError::Forbidden(
            "not authorized to cancel this reservation".to_string(),
        ));
    }

    let updated = repo.cancel_reservation(reservation_id).await?;
    info!("Reservation {} canceled by user {}", reservation_id, requester);
    Ok(updated)
}

/// Every reservation, newest first, for administrators.
pub async fn list_all_reservations(
    repo: &Arc<dyn FullRepository>,
) -> ServiceResult<Vec<ReservationDetail>> {
    Ok(repo.list_reservations_detailed().await?)
}

/// The caller's reservations ordered by start time.
pub async fn list_reservations_for_user(
    repo: &Arc<dyn FullRepository>,
    user_id: UserId,
) -> ServiceResult<Vec<ReservationDetail>> {
    Ok(repo.list_reservations_for_user(user_id).await?)
}
