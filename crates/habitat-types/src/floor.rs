use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::entity::{Entity, PhysicalEntity};
use crate::error::TypeError;
use crate::validation::ValidationErrors;

/// Id a floor may not take: it names the floors collection key of its building.
const RESERVED_IDS: &[&str] = &["floors"];

/// A level of a building.
///
/// The owning building is positional: it is known from where the floor was
/// read, never from the serialized payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    #[serde(skip)]
    building: String,
    #[serde(flatten)]
    pub entity: PhysicalEntity,
    #[serde(default)]
    pub level: i64,
}

/// Floors of one building keyed by id.
pub type Floors = BTreeMap<String, Floor>;

impl Floor {
    pub fn new(
        building: &Building,
        name: impl Into<String>,
        description: impl Into<String>,
        level: i64,
    ) -> Self {
        Self {
            building: building.id(),
            entity: PhysicalEntity::new(name, description),
            level,
        }
    }

    /// Id of the owning building.
    pub fn building_id(&self) -> &str {
        &self.building
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    /// Decode a client payload for a floor of `building` and validate it.
    pub fn from_json(building: &Building, data: &[u8]) -> Result<Self, TypeError> {
        let mut floor: Floor =
            serde_json::from_slice(data).map_err(|e| TypeError::parse("floor", e))?;
        floor.building = building.id();
        floor.validate()?;
        Ok(floor)
    }
}

impl Entity for Floor {
    fn id(&self) -> String {
        self.entity.id()
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_name(&self.entity.name, RESERVED_IDS);
        errors.require_non_zero_i64("level", self.level);
        errors.into_result()
    }
}

/// Decode a persisted floors collection of `building_id`.
///
/// Every floor is attached to the building and re-keyed by its own id.
pub fn decode_floors(building_id: &str, data: &[u8]) -> Result<Floors, TypeError> {
    let raw: Floors = serde_json::from_slice(data).map_err(|e| TypeError::parse("floors", e))?;
    Ok(raw
        .into_values()
        .map(|mut floor| {
            floor.building = building_id.to_string();
            (floor.id(), floor)
        })
        .collect())
}
