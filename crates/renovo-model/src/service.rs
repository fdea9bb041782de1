//! # Service Sections — Utility Service Tree
//!
//! A three-level owned tree (section → subsection → field) for tracking
//! building services (electrical, water, HVAC), independent of the main
//! work-breakdown sections.
//!
//! `linkedSections` entries on a field are loose references to main
//! section ids. They are intentionally NOT validated against existence —
//! a field may point at a section that was deleted later, and the link
//! simply goes stale.

use serde::{Deserialize, Serialize};

/// A leaf field of the service tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceField {
    /// Field id, unique within the subsection.
    pub id: String,
    /// Display name, e.g. `"Panel rating"`.
    pub name: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Loose references to main section ids (not validated).
    #[serde(default)]
    pub linked_sections: Vec<String>,
}

/// A grouping of fields inside a service section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSubsection {
    /// Subsection id, unique within the section.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Fields owned by this subsection.
    #[serde(default)]
    pub fields: Vec<ServiceField>,
}

/// A top-level service category, e.g. `"Electrical"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSection {
    /// Section id, unique within the project.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Subsections owned by this section.
    #[serde(default)]
    pub subsections: Vec<ServiceSubsection>,
}
