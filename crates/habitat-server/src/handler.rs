use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use habitat_types::{Building, Buildings, Entity, Floor, Floors, Room, Rooms};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::extract::{BuildingScope, FloorScope, RoomScope};
use crate::router::AppState;

/// Body of a successful create.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

type Result<T> = std::result::Result<T, ApiError>;

fn created(id: String) -> (StatusCode, Json<Created>) {
    (StatusCode::CREATED, Json(Created { id }))
}

fn conflict(kind: &str, id: &str) -> ApiError {
    ApiError::Conflict(format!("{kind} '{id}' already exists"))
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

pub async fn list_buildings(State(state): State<AppState>) -> Result<Json<Buildings>> {
    let buildings = state.blocking(|store| Ok(store.buildings()?)).await?;
    Ok(Json(buildings))
}

pub async fn create_building(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Created>)> {
    let building = Building::from_json(&body)?;
    let id = state
        .blocking(move |store| {
            let id = building.id();
            let mut buildings = store.buildings()?;
            if buildings.contains_key(&id) {
                return Err(conflict("building", &id));
            }
            buildings.insert(id.clone(), building);
            store.upsert_buildings(&buildings)?;
            Ok(id)
        })
        .await?;
    tracing::info!(building = %id, "building created");
    Ok(created(id))
}

pub async fn get_building(scope: BuildingScope) -> Json<Building> {
    Json(scope.building)
}

pub async fn update_building(
    State(state): State<AppState>,
    _scope: BuildingScope,
    body: Bytes,
) -> Result<StatusCode> {
    let building = Building::from_json(&body)?;
    state
        .blocking(move |store| Ok(store.upsert_building(&building)?))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete_building(
    State(state): State<AppState>,
    scope: BuildingScope,
) -> Result<StatusCode> {
    let id = scope.building.id();
    let building = scope.building;
    state
        .blocking(move |store| Ok(store.delete_building(&building)?))
        .await?;
    tracing::info!(building = %id, "building deleted");
    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Floors
// ---------------------------------------------------------------------------

pub async fn list_floors(
    State(state): State<AppState>,
    scope: BuildingScope,
) -> Result<Json<Floors>> {
    let building = scope.building;
    let floors = state
        .blocking(move |store| Ok(store.floors(&building)?))
        .await?;
    Ok(Json(floors))
}

pub async fn create_floor(
    State(state): State<AppState>,
    scope: BuildingScope,
    body: Bytes,
) -> Result<(StatusCode, Json<Created>)> {
    let building = scope.building;
    let floor = Floor::from_json(&building, &body)?;
    let building_id = building.id();
    let id = state
        .blocking(move |store| {
            let id = floor.id();
            let mut floors = store.floors(&building)?;
            if floors.contains_key(&id) {
                return Err(conflict("floor", &id));
            }
            floors.insert(id.clone(), floor);
            store.upsert_floors(&building, &floors)?;
            Ok(id)
        })
        .await?;
    tracing::info!(building = %building_id, floor = %id, "floor created");
    Ok(created(id))
}

pub async fn get_floor(scope: FloorScope) -> Json<Floor> {
    Json(scope.floor)
}

pub async fn update_floor(
    State(state): State<AppState>,
    scope: FloorScope,
    body: Bytes,
) -> Result<StatusCode> {
    let floor = Floor::from_json(&scope.building, &body)?;
    state
        .blocking(move |store| Ok(store.upsert_floor(&floor)?))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete_floor(State(state): State<AppState>, scope: FloorScope) -> Result<StatusCode> {
    let (building_id, id) = (scope.building.id(), scope.floor.id());
    let floor = scope.floor;
    state
        .blocking(move |store| Ok(store.delete_floor(&floor)?))
        .await?;
    tracing::info!(building = %building_id, floor = %id, "floor deleted");
    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

pub async fn list_rooms(State(state): State<AppState>, scope: FloorScope) -> Result<Json<Rooms>> {
    let floor = scope.floor;
    let rooms = state.blocking(move |store| Ok(store.rooms(&floor)?)).await?;
    Ok(Json(rooms))
}

pub async fn create_room(
    State(state): State<AppState>,
    scope: FloorScope,
    body: Bytes,
) -> Result<(StatusCode, Json<Created>)> {
    let floor = scope.floor;
    let room = Room::from_json(&floor, &body)?;
    let (building_id, floor_id) = (scope.building.id(), floor.id());
    let id = state
        .blocking(move |store| {
            let id = room.id();
            let mut rooms = store.rooms(&floor)?;
            if rooms.contains_key(&id) {
                return Err(conflict("room", &id));
            }
            rooms.insert(id.clone(), room);
            store.upsert_rooms(&floor, &rooms)?;
            Ok(id)
        })
        .await?;
    tracing::info!(building = %building_id, floor = %floor_id, room = %id, "room created");
    Ok(created(id))
}

pub async fn get_room(scope: RoomScope) -> Json<Room> {
    Json(scope.room)
}

pub async fn update_room(
    State(state): State<AppState>,
    scope: RoomScope,
    body: Bytes,
) -> Result<StatusCode> {
    let room = Room::from_json(&scope.floor, &body)?;
    state
        .blocking(move |store| Ok(store.upsert_room(&room)?))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete_room(State(state): State<AppState>, scope: RoomScope) -> Result<StatusCode> {
    let (building_id, floor_id, id) = (scope.building.id(), scope.floor.id(), scope.room.id());
    let room = scope.room;
    state
        .blocking(move |store| Ok(store.delete_room(&room)?))
        .await?;
    tracing::info!(building = %building_id, floor = %floor_id, room = %id, "room deleted");
    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Liveness check reporting when the server started.
pub async fn ping(State(state): State<AppState>) -> Result<Json<Value>> {
    let status = state
        .blocking(|store| {
            store.uptime().map_err(|e| {
                ApiError::Internal(format!("unable to read uptime from store: {e}"))
            })
        })
        .await?;
    Ok(Json(json!({ "status": status })))
}
