//! Parking location model.

use serde::{Deserialize, Serialize};

use super::{LocationId, Slot};

/// A parking site owning zero or more slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: String,
}

/// Location joined with its slots, as returned by the public listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWithSlots {
    #[serde(flatten)]
    pub location: Location,
    pub slots: Vec<Slot>,
}

/// Payload for creating a location.
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub address: String,
}

/// Partial update for a location; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub address: Option<String>,
}
