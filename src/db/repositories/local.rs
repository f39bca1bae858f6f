//! In-memory repository implementation.
//!
//! Used for unit/integration testing and local development. All state lives
//! in `parking_lot` guarded maps. Admission takes a per-slot mutex across
//! the whole check-and-insert sequence, so concurrent requests against the
//! same slot serialize and exactly one of two overlapping bookings wins.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use crate::db::repository::{
    HealthRepository, LocationRepository, RepositoryError, RepositoryResult,
    ReservationRepository, SlotRepository, UserRepository,
};
use crate::models::{
    Location, LocationId, LocationWithSlots, NewLocation, NewReservation, NewSlot, NewUser,
    Reservation, ReservationDetail, ReservationId, Slot, SlotId, SlotStatus, SlotWithLocation,
    UpdateLocation, UpdateSlot, User, UserId,
};

/// In-memory implementation of the full repository interface.
#[derive(Default)]
pub struct LocalRepository {
    users: RwLock<HashMap<UserId, User>>,
    locations: RwLock<HashMap<LocationId, Location>>,
    slots: RwLock<HashMap<SlotId, Slot>>,
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
    /// One admission lock per slot; see [`ReservationRepository::admit_reservation`].
    admission_locks: Mutex<HashMap<SlotId, Arc<Mutex<()>>>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn admission_lock(&self, slot_id: SlotId) -> Arc<Mutex<()>> {
        let mut locks = self.admission_locks.lock();
        Arc::clone(locks.entry(slot_id).or_default())
    }

    fn slot_detail(&self, reservation: &Reservation) -> Option<(User, Slot, Location)> {
        let user = self.users.read().get(&reservation.user_id).cloned()?;
        let slot = self.slots.read().get(&reservation.slot_id).cloned()?;
        let location = self.locations.read().get(&slot.location_id).cloned()?;
        Some((user, slot, location))
    }

    fn to_detail(&self, reservation: Reservation) -> Option<ReservationDetail> {
        let (user, slot, location) = self.slot_detail(&reservation)?;
        Some(ReservationDetail {
            reservation,
            user: user.public(),
            slot,
            location,
        })
    }

    fn identifier_taken(&self, location_id: LocationId, identifier: &str, exclude: Option<SlotId>) -> bool {
        self.slots.read().values().any(|slot| {
            slot.location_id == location_id
                && slot.identifier == identifier
                && Some(slot.id) != exclude
        })
    }
}

#[async_trait]
impl HealthRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::conflict("user already exists"));
        }
        let user = User {
            id: UserId::new(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl LocationRepository for LocalRepository {
    async fn create_location(&self, new_location: NewLocation) -> RepositoryResult<Location> {
        let location = Location {
            id: LocationId::new(),
            name: new_location.name,
            address: new_location.address,
        };
        self.locations.write().insert(location.id, location.clone());
        Ok(location)
    }

    async fn list_locations(&self) -> RepositoryResult<Vec<LocationWithSlots>> {
        let slots = self.slots.read();
        let mut listed: Vec<LocationWithSlots> = self
            .locations
            .read()
            .values()
            .map(|location| LocationWithSlots {
                location: location.clone(),
                slots: slots
                    .values()
                    .filter(|s| s.location_id == location.id)
                    .cloned()
                    .collect(),
            })
            .collect();
        listed.sort_by(|a, b| a.location.name.cmp(&b.location.name));
        Ok(listed)
    }

    async fn find_location(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        Ok(self.locations.read().get(&id).cloned())
    }

    async fn update_location(
        &self,
        id: LocationId,
        update: UpdateLocation,
    ) -> RepositoryResult<Location> {
        let mut locations = self.locations.write();
        let location = locations
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("location not found"))?;
        if let Some(name) = update.name {
            location.name = name;
        }
        if let Some(address) = update.address {
            location.address = address;
        }
        Ok(location.clone())
    }

    async fn delete_location(&self, id: LocationId) -> RepositoryResult<()> {
        if self.locations.write().remove(&id).is_none() {
            return Err(RepositoryError::not_found("location not found"));
        }
        // Cascade, matching the Postgres schema's ON DELETE CASCADE.
        let removed: Vec<SlotId> = {
            let mut slots = self.slots.write();
            let ids: Vec<SlotId> = slots
                .values()
                .filter(|s| s.location_id == id)
                .map(|s| s.id)
                .collect();
            for slot_id in &ids {
                slots.remove(slot_id);
            }
            ids
        };
        self.reservations
            .write()
            .retain(|_, r| !removed.contains(&r.slot_id));
        Ok(())
    }
}

#[async_trait]
impl SlotRepository for LocalRepository {
    async fn create_slot(&self, new_slot: NewSlot) -> RepositoryResult<Slot> {
        if !self.locations.read().contains_key(&new_slot.location_id) {
            return Err(RepositoryError::not_found("location not found"));
        }
        if self.identifier_taken(new_slot.location_id, &new_slot.identifier, None) {
            return Err(RepositoryError::conflict(
                "slot with this identifier already exists at this location",
            ));
        }
        let slot = Slot {
            id: SlotId::new(),
            identifier: new_slot.identifier,
            status: new_slot.status,
            location_id: new_slot.location_id,
        };
        self.slots.write().insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn list_slots(&self) -> RepositoryResult<Vec<SlotWithLocation>> {
        let locations = self.locations.read();
        let mut listed: Vec<SlotWithLocation> = self
            .slots
            .read()
            .values()
            .filter_map(|slot| {
                locations.get(&slot.location_id).map(|location| SlotWithLocation {
                    slot: slot.clone(),
                    location: location.clone(),
                })
            })
            .collect();
        listed.sort_by(|a, b| a.slot.identifier.cmp(&b.slot.identifier));
        Ok(listed)
    }

    async fn list_slots_by_location(
        &self,
        location_id: LocationId,
    ) -> RepositoryResult<Vec<Slot>> {
        if !self.locations.read().contains_key(&location_id) {
            return Err(RepositoryError::not_found("location not found"));
        }
        let mut slots: Vec<Slot> = self
            .slots
            .read()
            .values()
            .filter(|s| s.location_id == location_id)
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(slots)
    }

    async fn find_slot(&self, id: SlotId) -> RepositoryResult<Option<Slot>> {
        Ok(self.slots.read().get(&id).cloned())
    }

    async fn update_slot(&self, id: SlotId, update: UpdateSlot) -> RepositoryResult<Slot> {
        let current = self
            .slots
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("slot not found"))?;

        let identifier = update.identifier.unwrap_or_else(|| current.identifier.clone());
        let location_id = update.location_id.unwrap_or(current.location_id);
        let status = update.status.unwrap_or(current.status);

        if location_id != current.location_id
            && !self.locations.read().contains_key(&location_id)
        {
            return Err(RepositoryError::not_found("location not found"));
        }
        if (identifier != current.identifier || location_id != current.location_id)
            && self.identifier_taken(location_id, &identifier, Some(id))
        {
            return Err(RepositoryError::conflict(
                "slot with this identifier already exists at this location",
            ));
        }

        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("slot not found"))?;
        slot.identifier = identifier;
        slot.location_id = location_id;
        slot.status = status;
        Ok(slot.clone())
    }

    async fn delete_slot(&self, id: SlotId) -> RepositoryResult<()> {
        if self.slots.write().remove(&id).is_none() {
            return Err(RepositoryError::not_found("slot not found"));
        }
        self.reservations.write().retain(|_, r| r.slot_id != id);
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn admit_reservation(&self, new: NewReservation) -> RepositoryResult<Reservation> {
        // Serialize check-and-insert per slot. The guard must span both the
        // overlap scan and the insert or two racers could both pass the scan.
        let slot_lock = self.admission_lock(new.slot_id);
        let _guard = slot_lock.lock();

        let slot = self
            .slots
            .read()
            .get(&new.slot_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("slot not found"))?;
        if slot.status != SlotStatus::Available {
            return Err(RepositoryError::conflict("slot is not available"));
        }

        let overlapping = self.reservations.read().values().any(|existing| {
            existing.slot_id == new.slot_id
                && existing.is_active()
                && existing.window().overlaps(&new.window)
        });
        if overlapping {
            return Err(RepositoryError::conflict("time slot already booked"));
        }

        let reservation = Reservation {
            id: ReservationId::new(),
            user_id: new.user_id,
            slot_id: new.slot_id,
            start_time: new.window.start,
            end_time: new.window.end,
            canceled: false,
            created_at: Utc::now(),
        };
        self.reservations
            .write()
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_reservation(
        &self,
        id: ReservationId,
    ) -> RepositoryResult<Option<Reservation>> {
        Ok(self.reservations.read().get(&id).cloned())
    }

    async fn cancel_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation> {
        let mut reservations = self.reservations.write();
        let reservation = reservations
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("reservation not found"))?;
        reservation.canceled = true;
        Ok(reservation.clone())
    }

    async fn list_reservations_detailed(&self) -> RepositoryResult<Vec<ReservationDetail>> {
        let mut all: Vec<Reservation> = self.reservations.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all.into_iter().filter_map(|r| self.to_detail(r)).collect())
    }

    async fn list_reservations_for_user(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<ReservationDetail>> {
        let mut mine: Vec<Reservation> = self
            .reservations
            .read()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(mine.into_iter().filter_map(|r| self.to_detail(r)).collect())
    }

    async fn list_active_reservations_for_slot(
        &self,
        slot_id: SlotId,
    ) -> RepositoryResult<Vec<Reservation>> {
        let mut active: Vec<Reservation> = self
            .reservations
            .read()
            .values()
            .filter(|r| r.slot_id == slot_id && r.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(active)
    }
}
