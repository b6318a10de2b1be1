use habitat_types::{Building, Buildings, Floor, Floors, Room, Rooms, Status};

use crate::error::{StoreError, StoreResult};

/// Persistence seam for the building → floor → room hierarchy.
///
/// Implementations must satisfy these invariants:
/// - Collection reads (`buildings`, `floors`, `rooms`) treat a missing
///   collection as empty rather than an error.
/// - `upsert_*_collection`-style writes (`upsert_buildings`, ...) overwrite
///   the whole collection unconditionally.
/// - Single-item upserts and deletes read the owning collection, modify it,
///   and write it back. They are not atomic across the read and the write.
/// - Deletes remove the entity from its collection first and then its own
///   subtree; a missing subtree is not an error.
/// - Parent links of returned floors and rooms are set from the arguments,
///   never from stored data.
pub trait HierarchyStore: Send + Sync {
    /// All buildings.
    fn buildings(&self) -> StoreResult<Buildings>;

    /// Replace the buildings collection.
    fn upsert_buildings(&self, buildings: &Buildings) -> StoreResult<()>;

    /// Insert or replace one building by id.
    fn upsert_building(&self, building: &Building) -> StoreResult<()>;

    /// Remove a building and everything stored below it.
    fn delete_building(&self, building: &Building) -> StoreResult<()>;

    /// All floors of `building`.
    fn floors(&self, building: &Building) -> StoreResult<Floors>;

    /// Replace the floors collection of `building`.
    fn upsert_floors(&self, building: &Building, floors: &Floors) -> StoreResult<()>;

    /// Insert or replace one floor in its building's collection.
    fn upsert_floor(&self, floor: &Floor) -> StoreResult<()>;

    /// Remove a floor and everything stored below it.
    fn delete_floor(&self, floor: &Floor) -> StoreResult<()>;

    /// All rooms of `floor`.
    fn rooms(&self, floor: &Floor) -> StoreResult<Rooms>;

    /// Replace the rooms collection of `floor`.
    fn upsert_rooms(&self, floor: &Floor, rooms: &Rooms) -> StoreResult<()>;

    /// Insert or replace one room in its floor's collection.
    fn upsert_room(&self, room: &Room) -> StoreResult<()>;

    /// Remove a room and everything stored below it.
    fn delete_room(&self, room: &Room) -> StoreResult<()>;

    /// Server status; synthesized as "started now" when nothing is stored.
    fn uptime(&self) -> StoreResult<Status>;

    /// Record "started now" as the server status.
    fn refresh_uptime(&self) -> StoreResult<()>;

    /// Look up one building, failing with [`StoreError::NotFound`].
    fn find_building(&self, id: &str) -> StoreResult<Building> {
        self.buildings()?
            .remove(id)
            .ok_or_else(|| StoreError::not_found(format!("building '{id}' not found")))
    }

    /// Look up one floor of `building`, failing with [`StoreError::NotFound`].
    fn find_floor(&self, building: &Building, id: &str) -> StoreResult<Floor> {
        self.floors(building)?
            .remove(id)
            .ok_or_else(|| StoreError::not_found(format!("floor '{id}' not found")))
    }

    /// Look up one room of `floor`, failing with [`StoreError::NotFound`].
    fn find_room(&self, floor: &Floor, id: &str) -> StoreResult<Room> {
        self.rooms(floor)?
            .remove(id)
            .ok_or_else(|| StoreError::not_found(format!("room '{id}' not found")))
    }
}
