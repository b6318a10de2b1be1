//! Cascading resolution of the building → floor → room chain.
//!
//! Before a handler runs, the resolvers for every level named in the URL are
//! run in order. Each resolver reads its level's collection from the store,
//! looks up the path-supplied id and records the result in a typed
//! [`Resolution`]. The first resolver that does not find its entity, or that
//! hits a store error, ends the request; later resolvers and the handler are
//! never invoked.
//!
//! Resolvers only read. A request aborted during resolution therefore never
//! leaves a partial write behind.

use std::fmt;

use habitat_store::{HierarchyStore, StoreError};
use habitat_types::{Building, Buildings, Floor, Floors, Room, Rooms};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Level / PathIds
// ---------------------------------------------------------------------------

/// A level of the hierarchy, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Building,
    Floor,
    Room,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Floor => "floor",
            Self::Room => "room",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ids taken from the request path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PathIds {
    pub building_id: Option<String>,
    pub floor_id: Option<String>,
    pub room_id: Option<String>,
}

impl PathIds {
    pub fn building(id: impl Into<String>) -> Self {
        Self {
            building_id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn floor(building: impl Into<String>, floor: impl Into<String>) -> Self {
        Self {
            floor_id: Some(floor.into()),
            ..Self::building(building)
        }
    }

    pub fn room(
        building: impl Into<String>,
        floor: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            room_id: Some(room.into()),
            ..Self::floor(building, floor)
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Per-request record of resolved ancestors, filled one level at a time.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    pub buildings: Option<Buildings>,
    pub building: Option<Building>,
    pub floors: Option<Floors>,
    pub floor: Option<Floor>,
    pub rooms: Option<Rooms>,
    pub room: Option<Room>,
    resolved: Vec<Level>,
}

impl Resolution {
    /// Levels resolved so far, in order.
    pub fn resolved(&self) -> &[Level] {
        &self.resolved
    }
}

// ---------------------------------------------------------------------------
// Resolver trait
// ---------------------------------------------------------------------------

/// Outcome of one resolver step.
#[derive(Debug)]
pub enum StepOutcome {
    /// The entity was found and recorded; run the next step.
    Continue,
    /// The entity (or a required ancestor) does not exist.
    NotFound(String),
    /// The store failed.
    Failed(StoreError),
}

/// One step of the resolution chain.
///
/// Resolvers are stateless; everything they learn goes into the
/// [`Resolution`] they are handed.
pub trait Resolver: Send + Sync {
    /// The level this resolver fills in.
    fn level(&self) -> Level;

    fn resolve(
        &self,
        store: &dyn HierarchyStore,
        ids: &PathIds,
        resolution: &mut Resolution,
    ) -> StepOutcome;
}

/// Resolves the building named by `building_id`.
pub struct BuildingResolver;

impl Resolver for BuildingResolver {
    fn level(&self) -> Level {
        Level::Building
    }

    fn resolve(
        &self,
        store: &dyn HierarchyStore,
        ids: &PathIds,
        resolution: &mut Resolution,
    ) -> StepOutcome {
        let buildings = match store.buildings() {
            Ok(buildings) => buildings,
            Err(e) => return StepOutcome::Failed(e),
        };
        let Some(id) = ids.building_id.as_deref() else {
            return StepOutcome::NotFound("building id missing from request path".into());
        };
        let Some(building) = buildings.get(id).cloned() else {
            return StepOutcome::NotFound(format!("building '{id}' not found"));
        };
        resolution.building = Some(building);
        resolution.buildings = Some(buildings);
        StepOutcome::Continue
    }
}

/// Resolves `floor_id` inside the building resolved before it.
pub struct FloorResolver;

impl Resolver for FloorResolver {
    fn level(&self) -> Level {
        Level::Floor
    }

    fn resolve(
        &self,
        store: &dyn HierarchyStore,
        ids: &PathIds,
        resolution: &mut Resolution,
    ) -> StepOutcome {
        let Some(building) = resolution.building.as_ref() else {
            return StepOutcome::NotFound("building was not resolved before floor".into());
        };
        let floors = match store.floors(building) {
            Ok(floors) => floors,
            Err(e) => return StepOutcome::Failed(e),
        };
        let Some(id) = ids.floor_id.as_deref() else {
            return StepOutcome::NotFound("floor id missing from request path".into());
        };
        let Some(floor) = floors.get(id).cloned() else {
            return StepOutcome::NotFound(format!("floor '{id}' not found"));
        };
        resolution.floor = Some(floor);
        resolution.floors = Some(floors);
        StepOutcome::Continue
    }
}

/// Resolves `room_id` inside the floor resolved before it.
pub struct RoomResolver;

impl Resolver for RoomResolver {
    fn level(&self) -> Level {
        Level::Room
    }

    fn resolve(
        &self,
        store: &dyn HierarchyStore,
        ids: &PathIds,
        resolution: &mut Resolution,
    ) -> StepOutcome {
        let Some(floor) = resolution.floor.as_ref() else {
            return StepOutcome::NotFound("floor was not resolved before room".into());
        };
        let rooms = match store.rooms(floor) {
            Ok(rooms) => rooms,
            Err(e) => return StepOutcome::Failed(e),
        };
        let Some(id) = ids.room_id.as_deref() else {
            return StepOutcome::NotFound("room id missing from request path".into());
        };
        let Some(room) = rooms.get(id).cloned() else {
            return StepOutcome::NotFound(format!("room '{id}' not found"));
        };
        resolution.room = Some(room);
        resolution.rooms = Some(rooms);
        StepOutcome::Continue
    }
}

// ---------------------------------------------------------------------------
// ResolverChain
// ---------------------------------------------------------------------------

/// Why a chain stopped before reaching the handler.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{reason}")]
    NotFound { level: Level, reason: String },

    #[error("{source}")]
    Store {
        level: Level,
        #[source]
        source: StoreError,
    },
}

impl ResolveError {
    /// The level whose resolver ended the chain.
    pub fn level(&self) -> Level {
        match self {
            Self::NotFound { level, .. } | Self::Store { level, .. } => *level,
        }
    }
}

/// Ordered resolvers guarding a route.
pub struct ResolverChain {
    steps: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    /// An empty chain; resolves nothing.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// The chain for a route `depth` levels deep: exactly the resolvers from
    /// building down to `depth`, in order.
    pub fn for_depth(depth: Level) -> Self {
        let mut chain = Self::new();
        chain.push(Box::new(BuildingResolver));
        if depth >= Level::Floor {
            chain.push(Box::new(FloorResolver));
        }
        if depth >= Level::Room {
            chain.push(Box::new(RoomResolver));
        }
        chain
    }

    pub fn push(&mut self, step: Box<dyn Resolver>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Levels this chain resolves, in order.
    pub fn levels(&self) -> Vec<Level> {
        self.steps.iter().map(|s| s.level()).collect()
    }

    /// Run every step in order, stopping at the first that does not continue.
    pub fn run(
        &self,
        store: &dyn HierarchyStore,
        ids: &PathIds,
    ) -> Result<Resolution, ResolveError> {
        let mut resolution = Resolution::default();
        for step in &self.steps {
            let level = step.level();
            match step.resolve(store, ids, &mut resolution) {
                StepOutcome::Continue => resolution.resolved.push(level),
                StepOutcome::NotFound(reason) => {
                    tracing::debug!(%level, %reason, "resolution stopped: not found");
                    return Err(ResolveError::NotFound { level, reason });
                }
                StepOutcome::Failed(source) => {
                    tracing::warn!(%level, error = %source, "resolution stopped: store error");
                    return Err(ResolveError::Store { level, source });
                }
            }
        }
        Ok(resolution)
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}
