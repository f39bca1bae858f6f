//! Reservation repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{
    NewReservation, Reservation, ReservationDetail, ReservationId, SlotId, UserId,
};

/// Repository trait for reservations.
///
/// The store owns the atomicity of admission: `admit_reservation` performs
/// the slot-state check, the overlap check and the insert as a single unit,
/// so two racing requests for overlapping windows on one slot can never both
/// commit. The in-memory backend holds a per-slot mutex across the
/// check-and-insert; the Postgres backend runs it inside a SERIALIZABLE
/// transaction.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Atomically admit a reservation.
    ///
    /// # Returns
    /// * `Ok(Reservation)` - The persisted record, `canceled = false`
    /// * `Err(RepositoryError::NotFound)` - Unknown slot
    /// * `Err(RepositoryError::Conflict)` - Slot not available, or an active
    ///   reservation overlaps the requested window
    async fn admit_reservation(&self, new: NewReservation) -> RepositoryResult<Reservation>;

    /// Look up a reservation by id.
    async fn find_reservation(&self, id: ReservationId)
        -> RepositoryResult<Option<Reservation>>;

    /// Flip `canceled` to true and return the updated record.
    ///
    /// Cancelling an already-canceled reservation succeeds and leaves the
    /// flag set. Ownership checks are the caller's concern.
    async fn cancel_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation>;

    /// Every reservation, newest first, joined with user and slot → location.
    async fn list_reservations_detailed(&self) -> RepositoryResult<Vec<ReservationDetail>>;

    /// One user's reservations ordered by start time ascending, joined with
    /// slot → location.
    async fn list_reservations_for_user(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<ReservationDetail>>;

    /// Active (non-canceled) reservations on one slot.
    async fn list_active_reservations_for_slot(
        &self,
        slot_id: SlotId,
    ) -> RepositoryResult<Vec<Reservation>>;
}
