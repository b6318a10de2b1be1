use std::sync::Arc;

use habitat_types::{
    decode_buildings, decode_floors, decode_rooms, Building, Buildings, Entity, Floor, Floors,
    Room, Rooms, Status, START_TIME,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::KvBackend;
use crate::error::{KvError, StoreResult};
use crate::hierarchy::HierarchyStore;
use crate::keys::KeyLayout;

/// RFC 822 with a numeric zone, e.g. `18 Oct 26 14:03 +0200`.
const START_TIME_FORMAT: &str = "%d %b %y %H:%M %z";

/// [`HierarchyStore`] over any [`KvBackend`].
///
/// Holds nothing but the key layout and the shared backend handle: no cache,
/// no lock. Every call goes to the backend.
#[derive(Clone)]
pub struct PersistentStore {
    keys: KeyLayout,
    backend: Arc<dyn KvBackend>,
}

impl PersistentStore {
    /// Create a store that keeps all data below `root` in `backend`.
    pub fn new(root: impl AsRef<str>, backend: Arc<dyn KvBackend>) -> Self {
        Self {
            keys: KeyLayout::new(root),
            backend,
        }
    }

    pub fn keys(&self) -> &KeyLayout {
        &self.keys
    }

    /// Read `key`, mapping a backend miss to `None`.
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        debug!(key, "read");
        match self.backend.get(key) {
            Ok(data) => Ok(Some(data)),
            Err(KvError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let data = serde_json::to_vec(value)?;
        debug!(key, bytes = data.len(), "write");
        self.backend.put(key, &data)?;
        Ok(())
    }

    /// Remove a subtree; a subtree that does not exist counts as removed.
    fn safe_delete(&self, prefix: &str) -> StoreResult<()> {
        match self.backend.delete_tree(prefix) {
            Ok(()) | Err(KvError::KeyNotFound(_)) => Ok(()),
            Err(e) => {
                warn!(prefix, error = %e, "collection updated but subtree cleanup failed");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("root", &self.keys.root())
            .finish()
    }
}

fn now() -> String {
    chrono::Local::now().format(START_TIME_FORMAT).to_string()
}

fn started_now() -> Status {
    Status::from([(START_TIME.to_string(), now())])
}

impl PersistentStore {
    fn floors_of(&self, building_id: &str) -> StoreResult<Floors> {
        match self.read(&self.keys.floors(building_id))? {
            Some(data) => Ok(decode_floors(building_id, &data)?),
            None => Ok(Floors::new()),
        }
    }

    fn rooms_of(&self, building_id: &str, floor_id: &str) -> StoreResult<Rooms> {
        match self.read(&self.keys.rooms(building_id, floor_id))? {
            Some(data) => Ok(decode_rooms(building_id, floor_id, &data)?),
            None => Ok(Rooms::new()),
        }
    }
}

impl HierarchyStore for PersistentStore {
    fn buildings(&self) -> StoreResult<Buildings> {
        match self.read(&self.keys.buildings())? {
            Some(data) => Ok(decode_buildings(&data)?),
            None => Ok(Buildings::new()),
        }
    }

    fn upsert_buildings(&self, buildings: &Buildings) -> StoreResult<()> {
        self.put_json(&self.keys.buildings(), buildings)
    }

    fn upsert_building(&self, building: &Building) -> StoreResult<()> {
        let mut buildings = self.buildings()?;
        buildings.insert(building.id(), building.clone());
        self.upsert_buildings(&buildings)
    }

    fn delete_building(&self, building: &Building) -> StoreResult<()> {
        let mut buildings = self.buildings()?;
        let id = building.id();
        buildings.remove(&id);
        self.upsert_buildings(&buildings)?;
        self.safe_delete(&self.keys.building(&id))
    }

    fn floors(&self, building: &Building) -> StoreResult<Floors> {
        self.floors_of(&building.id())
    }

    fn upsert_floors(&self, building: &Building, floors: &Floors) -> StoreResult<()> {
        self.put_json(&self.keys.floors(&building.id()), floors)
    }

    fn upsert_floor(&self, floor: &Floor) -> StoreResult<()> {
        let building_id = floor.building_id();
        let mut floors = self.floors_of(building_id)?;
        floors.insert(floor.id(), floor.clone());
        self.put_json(&self.keys.floors(building_id), &floors)
    }

    fn delete_floor(&self, floor: &Floor) -> StoreResult<()> {
        let building_id = floor.building_id();
        let mut floors = self.floors_of(building_id)?;
        let id = floor.id();
        floors.remove(&id);
        self.put_json(&self.keys.floors(building_id), &floors)?;
        self.safe_delete(&self.keys.floor(building_id, &id))
    }

    fn rooms(&self, floor: &Floor) -> StoreResult<Rooms> {
        self.rooms_of(floor.building_id(), &floor.id())
    }

    fn upsert_rooms(&self, floor: &Floor, rooms: &Rooms) -> StoreResult<()> {
        self.put_json(&self.keys.rooms(floor.building_id(), &floor.id()), rooms)
    }

    fn upsert_room(&self, room: &Room) -> StoreResult<()> {
        let (building_id, floor_id) = (room.building_id(), room.floor_id());
        let mut rooms = self.rooms_of(building_id, floor_id)?;
        rooms.insert(room.id(), room.clone());
        self.put_json(&self.keys.rooms(building_id, floor_id), &rooms)
    }

    fn delete_room(&self, room: &Room) -> StoreResult<()> {
        let (building_id, floor_id) = (room.building_id(), room.floor_id());
        let mut rooms = self.rooms_of(building_id, floor_id)?;
        let id = room.id();
        rooms.remove(&id);
        self.put_json(&self.keys.rooms(building_id, floor_id), &rooms)?;
        self.safe_delete(&self.keys.room(building_id, floor_id, &id))
    }

    fn uptime(&self) -> StoreResult<Status> {
        match self.read(&self.keys.uptime())? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Ok(started_now()),
        }
    }

    fn refresh_uptime(&self) -> StoreResult<()> {
        self.put_json(&self.keys.uptime(), &started_now())
    }
}
