//! Store double for exercising handlers and resolvers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use habitat_store::{
    HierarchyStore, InMemoryBackend, KvError, PersistentStore, StoreError, StoreResult,
};
use habitat_types::{Building, Buildings, Floor, Floors, Room, Rooms, Status};

/// A [`PersistentStore`] over memory that counts calls per method, records
/// the calling threads and can be told to fail any method with a given
/// message.
pub struct MockStore {
    inner: PersistentStore,
    failures: Mutex<HashMap<&'static str, String>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    threads: Mutex<Vec<ThreadId>>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: PersistentStore::new("habitat", Arc::new(InMemoryBackend::new())),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            threads: Mutex::new(Vec::new()),
        })
    }

    pub fn fail(&self, method: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(method, message.to_string());
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    /// Threads every store call ran on, in call order.
    pub fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().unwrap().clone()
    }

    fn enter(&self, method: &'static str) -> StoreResult<()> {
        self.threads.lock().unwrap().push(thread::current().id());
        *self.calls.lock().unwrap().entry(method).or_default() += 1;
        match self.failures.lock().unwrap().get(method) {
            Some(message) => Err(StoreError::Backend(KvError::Unavailable(message.clone()))),
            None => Ok(()),
        }
    }
}

impl HierarchyStore for MockStore {
    fn buildings(&self) -> StoreResult<Buildings> {
        self.enter("buildings")?;
        self.inner.buildings()
    }

    fn upsert_buildings(&self, buildings: &Buildings) -> StoreResult<()> {
        self.enter("upsert_buildings")?;
        self.inner.upsert_buildings(buildings)
    }

    fn upsert_building(&self, building: &Building) -> StoreResult<()> {
        self.enter("upsert_building")?;
        self.inner.upsert_building(building)
    }

    fn delete_building(&self, building: &Building) -> StoreResult<()> {
        self.enter("delete_building")?;
        self.inner.delete_building(building)
    }

    fn floors(&self, building: &Building) -> StoreResult<Floors> {
        self.enter("floors")?;
        self.inner.floors(building)
    }

    fn upsert_floors(&self, building: &Building, floors: &Floors) -> StoreResult<()> {
        self.enter("upsert_floors")?;
        self.inner.upsert_floors(building, floors)
    }

    fn upsert_floor(&self, floor: &Floor) -> StoreResult<()> {
        self.enter("upsert_floor")?;
        self.inner.upsert_floor(floor)
    }

    fn delete_floor(&self, floor: &Floor) -> StoreResult<()> {
        self.enter("delete_floor")?;
        self.inner.delete_floor(floor)
    }

    fn rooms(&self, floor: &Floor) -> StoreResult<Rooms> {
        self.enter("rooms")?;
        self.inner.rooms(floor)
    }

    fn upsert_rooms(&self, floor: &Floor, rooms: &Rooms) -> StoreResult<()> {
        self.enter("upsert_rooms")?;
        self.inner.upsert_rooms(floor, rooms)
    }

    fn upsert_room(&self, room: &Room) -> StoreResult<()> {
        self.enter("upsert_room")?;
        self.inner.upsert_room(room)
    }

    fn delete_room(&self, room: &Room) -> StoreResult<()> {
        self.enter("delete_room")?;
        self.inner.delete_room(room)
    }

    fn uptime(&self) -> StoreResult<Status> {
        self.enter("uptime")?;
        self.inner.uptime()
    }

    fn refresh_uptime(&self) -> StoreResult<()> {
        self.enter("refresh_uptime")?;
        self.inner.refresh_uptime()
    }
}
