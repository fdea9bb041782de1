//! Unit and room operations.
//!
//! Deleting a unit detaches items pointing at it: their `unitId` is set
//! to null inside the same transform, the items themselves survive.

use renovo_core::{new_id, RepoError};
use renovo_model::{Project, Room, Unit};
use serde::Deserialize;

use crate::ops::require_free_id;
use crate::repository::Repository;

/// Payload for [`add_unit`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUnit {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Floor number.
    #[serde(default)]
    pub floor: i32,
    /// Bedroom count.
    #[serde(default)]
    pub bedrooms: u32,
    /// Total floor area in square metres.
    #[serde(default)]
    pub total_area_sqm: f64,
    /// Free-form status.
    #[serde(default)]
    pub status: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Patch payload for [`update_unit`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPatch {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New floor number.
    #[serde(default)]
    pub floor: Option<i32>,
    /// New bedroom count.
    #[serde(default)]
    pub bedrooms: Option<u32>,
    /// New floor area.
    #[serde(default)]
    pub total_area_sqm: Option<f64>,
    /// New status.
    #[serde(default)]
    pub status: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload for [`add_room`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Room kind, e.g. `"kitchen"`.
    pub room_type: String,
    /// Interior width in millimetres.
    #[serde(default)]
    pub width_mm: f64,
    /// Interior length in millimetres.
    #[serde(default)]
    pub length_mm: f64,
    /// Ceiling height in millimetres.
    #[serde(default)]
    pub height_mm: f64,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Patch payload for [`update_room`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    /// New room kind.
    #[serde(default)]
    pub room_type: Option<String>,
    /// New width.
    #[serde(default)]
    pub width_mm: Option<f64>,
    /// New length.
    #[serde(default)]
    pub length_mm: Option<f64>,
    /// New height.
    #[serde(default)]
    pub height_mm: Option<f64>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Create a new unit.
pub fn add_unit(
    repo: &Repository,
    project_id: &str,
    payload: NewUnit,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id("unit", &id, project.unit(&id).is_some())?;
        project.units.push(Unit {
            id,
            name: payload.name,
            floor: payload.floor,
            bedrooms: payload.bedrooms,
            total_area_sqm: payload.total_area_sqm,
            status: payload.status,
            description: payload.description,
            rooms: Vec::new(),
        });
        Ok(())
    })
}

/// Update a unit's scalar fields.
pub fn update_unit(
    repo: &Repository,
    project_id: &str,
    unit_id: &str,
    patch: UnitPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let unit = project
            .unit_mut(unit_id)
            .ok_or_else(|| RepoError::not_found("unit", unit_id))?;
        if let Some(name) = patch.name {
            unit.name = name;
        }
        if let Some(floor) = patch.floor {
            unit.floor = floor;
        }
        if let Some(bedrooms) = patch.bedrooms {
            unit.bedrooms = bedrooms;
        }
        if let Some(area) = patch.total_area_sqm {
            unit.total_area_sqm = area;
        }
        if let Some(status) = patch.status {
            unit.status = status;
        }
        if let Some(description) = patch.description {
            unit.description = description;
        }
        Ok(())
    })
}

/// Delete a unit, detaching (not deleting) any items tied to it.
pub fn delete_unit(
    repo: &Repository,
    project_id: &str,
    unit_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.unit(unit_id).is_none() {
            return Err(RepoError::not_found("unit", unit_id));
        }
        project.units.retain(|u| u.id != unit_id);
        for item in &mut project.items {
            if item.unit_id.as_deref() == Some(unit_id) {
                item.unit_id = None;
            }
        }
        Ok(())
    })
}

/// Add a room to a unit.
pub fn add_room(
    repo: &Repository,
    project_id: &str,
    unit_id: &str,
    payload: NewRoom,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let unit = project
            .unit_mut(unit_id)
            .ok_or_else(|| RepoError::not_found("unit", unit_id))?;
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id("room", &id, unit.rooms.iter().any(|r| r.id == id))?;
        unit.rooms.push(Room {
            id,
            room_type: payload.room_type,
            width_mm: payload.width_mm,
            length_mm: payload.length_mm,
            height_mm: payload.height_mm,
            description: payload.description,
        });
        Ok(())
    })
}

/// Update a room inside a unit.
pub fn update_room(
    repo: &Repository,
    project_id: &str,
    unit_id: &str,
    room_id: &str,
    patch: RoomPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let unit = project
            .unit_mut(unit_id)
            .ok_or_else(|| RepoError::not_found("unit", unit_id))?;
        let room = unit
            .rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| RepoError::not_found("room", room_id))?;
        if let Some(room_type) = patch.room_type {
            room.room_type = room_type;
        }
        if let Some(width) = patch.width_mm {
            room.width_mm = width;
        }
        if let Some(length) = patch.length_mm {
            room.length_mm = length;
        }
        if let Some(height) = patch.height_mm {
            room.height_mm = height;
        }
        if let Some(description) = patch.description {
            room.description = description;
        }
        Ok(())
    })
}

/// Remove a room from a unit.
pub fn delete_room(
    repo: &Repository,
    project_id: &str,
    unit_id: &str,
    room_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let unit = project
            .unit_mut(unit_id)
            .ok_or_else(|| RepoError::not_found("unit", unit_id))?;
        if !unit.rooms.iter().any(|r| r.id == room_id) {
            return Err(RepoError::not_found("room", room_id));
        }
        unit.rooms.retain(|r| r.id != room_id);
        Ok(())
    })
}
