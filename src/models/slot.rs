//! Parking slot model.

use serde::{Deserialize, Serialize};

use super::{Location, LocationId, SlotId};

/// Advisory availability flag set by administrators.
///
/// The flag gates admission (only `Available` slots accept new bookings) but
/// is not derived from the reservation calendar: a slot can read `Available`
/// while fully booked for a future window. The overlap check against active
/// reservations is the real gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Available,
    LimitedTime,
    Unavailable,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "AVAILABLE",
            SlotStatus::LimitedTime => "LIMITED_TIME",
            SlotStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

impl std::str::FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(SlotStatus::Available),
            "LIMITED_TIME" => Ok(SlotStatus::LimitedTime),
            "UNAVAILABLE" => Ok(SlotStatus::Unavailable),
            other => Err(format!("unknown slot status: {}", other)),
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bookable parking space at a location.
///
/// `identifier` (e.g. "A-12") is unique within its owning location only;
/// two different locations may both have an "A-12".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub identifier: String,
    pub status: SlotStatus,
    #[serde(rename = "locationId")]
    pub location_id: LocationId,
}

/// Slot joined with its owning location for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotWithLocation {
    #[serde(flatten)]
    pub slot: Slot,
    pub location: Location,
}

/// Payload for creating a slot.
#[derive(Debug, Clone)]
pub struct NewSlot {
    pub identifier: String,
    pub status: SlotStatus,
    pub location_id: LocationId,
}

/// Partial update for a slot; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateSlot {
    pub identifier: Option<String>,
    pub status: Option<SlotStatus>,
    pub location_id: Option<LocationId>,
}
