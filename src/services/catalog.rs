//! Location and slot management.
//!
//! Thin rules on top of the repository: required-field validation and id
//! parsing happen here, referential and uniqueness checks in the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::{FullRepository, LocationRepository, SlotRepository};
use crate::models::{
    Location, LocationId, LocationWithSlots, NewLocation, NewSlot, Slot, SlotId, SlotStatus,
    SlotWithLocation, UpdateLocation, UpdateSlot,
};

/// Location create payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateLocationRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Location update payload; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Slot create payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSlotRequest {
    pub identifier: Option<String>,
    pub location_id: Option<String>,
    pub status: Option<SlotStatus>,
}

/// Slot update payload; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSlotRequest {
    pub identifier: Option<String>,
    pub status: Option<SlotStatus>,
    pub location_id: Option<String>,
}

fn parse_location_id(raw: &str) -> ServiceResult<LocationId> {
    raw.parse::<Uuid>()
        .map(LocationId::from)
        .map_err(|_| ServiceError::Validation("invalid location id".to_string()))
}

// ==================== Locations ====================

pub async fn create_location(
    repo: &Arc<dyn FullRepository>,
    request: CreateLocationRequest,
) -> ServiceResult<Location> {
    let (name, address) = match (request.name, request.address) {
        (Some(name), Some(address)) if !name.is_empty() && !address.is_empty() => {
            (name, address)
        }
        _ => {
            return Err(ServiceError::Validation(
                "name and address are required".to_string(),
            ))
        }
    };

    let location = repo.create_location(NewLocation { name, address }).await?;
    info!("Location created: {}", location.name);
    Ok(location)
}

pub async fn list_locations(
    repo: &Arc<dyn FullRepository>,
) -> ServiceResult<Vec<LocationWithSlots>> {
    Ok(repo.list_locations().await?)
}

pub async fn update_location(
    repo: &Arc<dyn FullRepository>,
    id: LocationId,
    request: UpdateLocationRequest,
) -> ServiceResult<Location> {
    let location = repo
        .update_location(
            id,
            UpdateLocation {
                name: request.name,
                address: request.address,
            },
        )
        .await?;
    info!("Location updated: {}", id);
    Ok(location)
}

pub async fn delete_location(
    repo: &Arc<dyn FullRepository>,
    id: LocationId,
) -> ServiceResult<()> {
    repo.delete_location(id).await?;
    info!("Location deleted: {}", id);
    Ok(())
}

// ==================== Slots ====================

pub async fn create_slot(
    repo: &Arc<dyn FullRepository>,
    request: CreateSlotRequest,
) -> ServiceResult<Slot> {
    let (identifier, location_raw) = match (request.identifier, request.location_id) {
        (Some(identifier), Some(location)) if !identifier.is_empty() && !location.is_empty() => {
            (identifier, location)
        }
        _ => {
            return Err(ServiceError::Validation(
                "identifier and locationId are required".to_string(),
            ))
        }
    };
    let location_id = parse_location_id(&location_raw)?;

    let slot = repo
        .create_slot(NewSlot {
            identifier,
            status: request.status.unwrap_or(SlotStatus::Available),
            location_id,
        })
        .await?;
    info!("Slot created: {} at location {}", slot.identifier, location_id);
    Ok(slot)
}

pub async fn list_slots(repo: &Arc<dyn FullRepository>) -> ServiceResult<Vec<SlotWithLocation>> {
    Ok(repo.list_slots().await?)
}

pub async fn list_slots_by_location(
    repo: &Arc<dyn FullRepository>,
    location_id: LocationId,
) -> ServiceResult<Vec<Slot>> {
    Ok(repo.list_slots_by_location(location_id).await?)
}

pub async fn update_slot(
    repo: &Arc<dyn FullRepository>,
    id: SlotId,
    request: UpdateSlotRequest,
) -> ServiceResult<Slot> {
    let location_id = match request.location_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_location_id(raw)?),
        _ => None,
    };

    let slot = repo
        .update_slot(
            id,
            UpdateSlot {
                identifier: request.identifier,
                status: request.status,
                location_id,
            },
        )
        .await?;
    info!("Slot updated: {}", id);
    Ok(slot)
}

pub async fn delete_slot(repo: &Arc<dyn FullRepository>, id: SlotId) -> ServiceResult<()> {
    repo.delete_slot(id).await?;
    info!("Slot deleted: {}", id);
    Ok(())
}
