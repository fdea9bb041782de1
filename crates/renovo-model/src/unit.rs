//! # Units and Rooms
//!
//! A unit (apartment, floor, outbuilding) owns its rooms by composition.
//! Deleting a unit detaches any items pointing at it — their `unitId` is
//! set to null, the items themselves survive.

use serde::{Deserialize, Serialize};

/// A room inside a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Room id, unique within the unit.
    pub id: String,
    /// Room kind, e.g. `"kitchen"`, `"bathroom"`, `"bedroom"`. The
    /// obsolete combined `"kitchen_living_area"` value is rewritten to
    /// `"kitchen"` by the migrator.
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

/// A unit of the property under renovation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unit id, unique within the project.
    pub id: String,
    /// Display name, e.g. `"Apartment 2B"`.
    pub name: String,
    /// Floor number (may be negative for basements).
    #[serde(default)]
    pub floor: i32,
    /// Bedroom count. Legacy documents with negative or fractional values
    /// are reset to 0 by the migrator.
    #[serde(default)]
    pub bedrooms: u32,
    /// Total floor area in square metres.
    #[serde(default)]
    pub total_area_sqm: f64,
    /// Free-form status, e.g. `"gutted"`, `"ready"`.
    #[serde(default)]
    pub status: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Rooms owned by this unit.
    #[serde(default)]
    pub rooms: Vec<Room>,
}
