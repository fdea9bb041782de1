//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision.
//!
//! ## Invariant
//!
//! Project documents are written in full and diffed by tooling. Timestamps
//! must therefore serialize deterministically: always UTC, always `Z`
//! suffix, never sub-second digits. Non-UTC inputs are rejected by the
//! strict parser; the lenient parser (used when migrating legacy documents)
//! converts offsets to UTC instead.

use chrono::{DateTime, Timelike, Utc};
use serde::de;

use crate::error::RepoError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Serializes as `YYYY-MM-DDTHH:MM:SSZ`; deserialization is lenient and
/// converts any RFC 3339 offset to UTC, so legacy documents load cleanly.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`] — from an ISO8601 string, converting to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Timestamp::parse_lenient(&s).map_err(de::Error::custom)
    }
}

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted; explicit
    /// offsets, even `+00:00`, are rejected so that stored documents carry a
    /// single canonical form.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not valid RFC 3339 or
    /// uses a non-Z offset.
    pub fn parse(s: &str) -> Result<Self, RepoError> {
        if !s.ends_with('Z') {
            return Err(RepoError::validation(
                "Timestamp",
                format!("must use Z suffix (UTC only), got {s:?}"),
            ));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            RepoError::validation("Timestamp", format!("invalid RFC 3339 value {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any offset and
    /// converting to UTC.
    ///
    /// Used by the legacy document migrator, which must accept timestamps
    /// written by older clients that recorded local offsets.
    pub fn parse_lenient(s: &str) -> Result<Self, RepoError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            RepoError::validation("Timestamp", format!("invalid RFC 3339 value {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g. `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
