//! # Identifier Helpers
//!
//! Entity ids in a project document are plain strings: caller-visible slugs
//! like `"copper-pipe"` or generated UUIDs. This module is the only place
//! ids are minted.

use uuid::Uuid;

/// Generate a fresh random entity id (UUID v4, hyphenated lowercase).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derive a stable slug id from a human-entered name.
///
/// Lowercases, maps runs of non-alphanumeric characters to a single `-`,
/// and trims leading/trailing separators. Used by the legacy migrator to
/// mint catalog ids from inline material names; falls back to a UUID when
/// the name contains no usable characters.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        new_id()
    } else {
        slug
    }
}
