//! Location and slot repository traits.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{
    Location, LocationId, LocationWithSlots, NewLocation, NewSlot, Slot, SlotId, SlotWithLocation,
    UpdateLocation, UpdateSlot,
};

/// Repository trait for parking locations.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Create a location.
    async fn create_location(&self, new_location: NewLocation) -> RepositoryResult<Location>;

    /// List every location together with its slots.
    async fn list_locations(&self) -> RepositoryResult<Vec<LocationWithSlots>>;

    /// Look up a location by id.
    async fn find_location(&self, id: LocationId) -> RepositoryResult<Option<Location>>;

    /// Apply a partial update.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the location does not exist
    async fn update_location(
        &self,
        id: LocationId,
        update: UpdateLocation,
    ) -> RepositoryResult<Location>;

    /// Delete a location. Slot cascade behavior belongs to the store.
    async fn delete_location(&self, id: LocationId) -> RepositoryResult<()>;
}

/// Repository trait for parking slots.
///
/// Slot identifiers are unique per location; every create/update enforces
/// that scope and reports violations as `RepositoryError::Conflict`.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Create a slot.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the referenced location is absent
    /// * `Err(RepositoryError::Conflict)` - If the identifier is taken at that location
    async fn create_slot(&self, new_slot: NewSlot) -> RepositoryResult<Slot>;

    /// List every slot joined with its location.
    async fn list_slots(&self) -> RepositoryResult<Vec<SlotWithLocation>>;

    /// List the slots of one location.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the location does not exist
    async fn list_slots_by_location(&self, location_id: LocationId)
        -> RepositoryResult<Vec<Slot>>;

    /// Look up a slot by id.
    async fn find_slot(&self, id: SlotId) -> RepositoryResult<Option<Slot>>;

    /// Apply a partial update, re-checking identifier uniqueness when the
    /// identifier or owning location changes.
    async fn update_slot(&self, id: SlotId, update: UpdateSlot) -> RepositoryResult<Slot>;

    /// Delete a slot.
    async fn delete_slot(&self, id: SlotId) -> RepositoryResult<()>;
}
