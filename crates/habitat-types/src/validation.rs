//! Field-level validation results.
//!
//! Rules are evaluated per field and only the first failure of a field is
//! kept. The rendered message lists fields alphabetically:
//!
//! ```text
//! lat: cannot be blank; name: the length must be between 5 and 50.
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::entity::{slug, NAME_MAX_LEN, NAME_MIN_LEN};

pub(crate) const BLANK: &str = "cannot be blank";

/// Accumulated field errors for one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field` unless one is already recorded.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The recorded message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub(crate) fn require_non_zero_f64(&mut self, field: &'static str, value: f64) {
        if value == 0.0 {
            self.add(field, BLANK);
        }
    }

    pub(crate) fn require_non_zero_i64(&mut self, field: &'static str, value: i64) {
        if value == 0 {
            self.add(field, BLANK);
        }
    }

    /// Name rules shared by every level: required, bounded length, must
    /// produce a usable id that does not shadow a collection key.
    pub(crate) fn check_name(&mut self, name: &str, reserved: &[&str]) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            self.add("name", BLANK);
            return;
        }
        let len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            self.add(
                "name",
                format!("the length must be between {NAME_MIN_LEN} and {NAME_MAX_LEN}"),
            );
            return;
        }
        let id = slug(name);
        if id.is_empty() {
            self.add("name", "must contain at least one letter or digit");
        } else if reserved.contains(&id.as_str()) {
            self.add("name", format!("'{id}' is a reserved identifier"));
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        f.write_str(".")
    }
}

impl std::error::Error for ValidationErrors {}
