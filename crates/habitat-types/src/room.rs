use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::entity::{Entity, PhysicalEntity};
use crate::error::TypeError;
use crate::floor::Floor;
use crate::validation::ValidationErrors;

/// Id a room may not take: it names the rooms collection key of its floor.
const RESERVED_IDS: &[&str] = &["rooms"];

/// A space on a floor that can be occupied.
///
/// Like [`Floor`], the owning floor (and its building) are positional and
/// never serialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(skip)]
    building: String,
    #[serde(skip)]
    floor: String,
    #[serde(flatten)]
    pub entity: PhysicalEntity,
    pub direction: Direction,
}

/// Rooms of one floor keyed by id.
pub type Rooms = BTreeMap<String, Room>;

impl Room {
    pub fn new(
        floor: &Floor,
        name: impl Into<String>,
        description: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            building: floor.building_id().to_string(),
            floor: floor.id(),
            entity: PhysicalEntity::new(name, description),
            direction,
        }
    }

    pub fn building_id(&self) -> &str {
        &self.building
    }

    /// Id of the owning floor.
    pub fn floor_id(&self) -> &str {
        &self.floor
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    fn attach(&mut self, building: &str, floor: &str) {
        self.building = building.to_string();
        self.floor = floor.to_string();
    }

    /// Decode a client payload for a room of `floor` and validate it.
    pub fn from_json(floor: &Floor, data: &[u8]) -> Result<Self, TypeError> {
        let mut room: Room =
            serde_json::from_slice(data).map_err(|e| TypeError::parse("room", e))?;
        room.attach(floor.building_id(), &floor.id());
        room.validate()?;
        Ok(room)
    }
}

impl Entity for Room {
    fn id(&self) -> String {
        self.entity.id()
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_name(&self.entity.name, RESERVED_IDS);
        errors.into_result()
    }
}

/// Decode a persisted rooms collection of floor `floor_id` in building
/// `building_id`, attaching every room and re-keying it by its own id.
pub fn decode_rooms(building_id: &str, floor_id: &str, data: &[u8]) -> Result<Rooms, TypeError> {
    let raw: Rooms = serde_json::from_slice(data).map_err(|e| TypeError::parse("rooms", e))?;
    Ok(raw
        .into_values()
        .map(|mut room| {
            room.attach(building_id, floor_id);
            (room.id(), room)
        })
        .collect())
}
