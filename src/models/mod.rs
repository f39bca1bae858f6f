//! Domain models for the parking reservation service.
//!
//! Entities are plain serde-serializable structs keyed by UUID newtypes.
//! The `time` module holds the half-open reservation window type used by
//! the admission engine.

pub mod location;
pub mod reservation;
pub mod slot;
pub mod time;
pub mod user;

pub use location::{Location, LocationWithSlots, NewLocation, UpdateLocation};
pub use reservation::{NewReservation, Reservation, ReservationDetail};
pub use slot::{NewSlot, Slot, SlotStatus, SlotWithLocation, UpdateSlot};
pub use time::TimeWindow;
pub use user::{NewUser, Role, User, UserPublic};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// User identifier (database primary key).
    UserId
);
entity_id!(
    /// Location identifier.
    LocationId
);
entity_id!(
    /// Slot identifier.
    SlotId
);
entity_id!(
    /// Reservation identifier.
    ReservationId
);
