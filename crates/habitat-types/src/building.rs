use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, PhysicalEntity};
use crate::error::TypeError;
use crate::validation::ValidationErrors;

/// Ids a building may not take: they name the sibling keys at the store root.
const RESERVED_IDS: &[&str] = &["buildings", "status"];

/// A structure with a roof and walls. Top level of the hierarchy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    #[serde(flatten)]
    pub entity: PhysicalEntity,
    #[serde(default)]
    pub lat: f64,
    #[serde(default, alias = "lan")]
    pub lon: f64,
}

/// Buildings keyed by id.
pub type Buildings = BTreeMap<String, Building>;

impl Building {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            entity: PhysicalEntity::new(name, description),
            lat,
            lon,
        }
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    /// Decode a client payload and check it against the field rules.
    pub fn from_json(data: &[u8]) -> Result<Self, TypeError> {
        let building: Building =
            serde_json::from_slice(data).map_err(|e| TypeError::parse("building", e))?;
        building.validate()?;
        Ok(building)
    }
}

impl Entity for Building {
    fn id(&self) -> String {
        self.entity.id()
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_name(&self.entity.name, RESERVED_IDS);
        errors.require_non_zero_f64("lat", self.lat);
        errors.require_non_zero_f64("lon", self.lon);
        errors.into_result()
    }
}

/// Decode a persisted buildings collection.
pub fn decode_buildings(data: &[u8]) -> Result<Buildings, TypeError> {
    serde_json::from_slice(data).map_err(|e| TypeError::parse("buildings", e))
}
