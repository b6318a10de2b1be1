use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

/// Minimum number of characters in an entity name.
pub const NAME_MIN_LEN: usize = 5;
/// Maximum number of characters in an entity name.
pub const NAME_MAX_LEN: usize = 50;

/// Derive a stable identifier from a display name.
///
/// The result is lowercase, every run of non-alphanumeric characters becomes
/// a single `-`, and separators never lead or trail. Two names that slug to
/// the same id collide inside one collection.
///
/// ```
/// use habitat_types::slug;
///
/// assert_eq!(slug("Atlantis Tower"), "atlantis-tower");
/// assert_eq!(slug("  Floor #1 -- East  "), "floor-1-east");
/// ```
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;
    for ch in input.chars() {
        if !ch.is_alphanumeric() {
            pending_separator = true;
            continue;
        }
        for lower in ch.to_lowercase().filter(|c| c.is_alphanumeric()) {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(lower);
        }
    }
    out
}

/// A thing with distinct and independent existence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalEntity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl PhysicalEntity {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Slug of the name.
    pub fn id(&self) -> String {
        slug(&self.name)
    }
}

/// A uniquely identifiable, validatable member of the hierarchy.
pub trait Entity {
    /// Identifier inside the parent collection.
    fn id(&self) -> String;

    /// Check the entity against its field rules.
    fn validate(&self) -> Result<(), ValidationErrors>;
}
