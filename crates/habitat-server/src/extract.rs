//! Request extractors that run the resolver chain for a route's depth.
//!
//! A handler taking a [`FloorScope`] only runs once the building and floor
//! named in its path exist; otherwise the request ends with the chain's
//! 404 or 500 and the handler body is never entered.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use habitat_types::{Building, Buildings, Floor, Floors, Room, Rooms};

use crate::error::ApiError;
use crate::resolve::{Level, PathIds, Resolution, ResolverChain};
use crate::router::AppState;

async fn resolve(
    parts: &mut Parts,
    state: &AppState,
    depth: Level,
) -> Result<Resolution, ApiError> {
    let Path(ids) = Path::<PathIds>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?;
    state
        .blocking(move |store| Ok(ResolverChain::for_depth(depth).run(store, &ids)?))
        .await
}

fn slot<T>(value: Option<T>, what: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Internal(format!("{what} missing after resolution")))
}

/// A resolved building and the collection it was found in.
#[derive(Debug)]
pub struct BuildingScope {
    pub buildings: Buildings,
    pub building: Building,
}

#[async_trait]
impl FromRequestParts<AppState> for BuildingScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let r = resolve(parts, state, Level::Building).await?;
        Ok(Self {
            buildings: slot(r.buildings, "buildings")?,
            building: slot(r.building, "building")?,
        })
    }
}

/// A resolved floor, its building and the floors collection of that building.
#[derive(Debug)]
pub struct FloorScope {
    pub building: Building,
    pub floors: Floors,
    pub floor: Floor,
}

#[async_trait]
impl FromRequestParts<AppState> for FloorScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let r = resolve(parts, state, Level::Floor).await?;
        Ok(Self {
            building: slot(r.building, "building")?,
            floors: slot(r.floors, "floors")?,
            floor: slot(r.floor, "floor")?,
        })
    }
}

/// A resolved room with all of its ancestors.
#[derive(Debug)]
pub struct RoomScope {
    pub building: Building,
    pub floor: Floor,
    pub rooms: Rooms,
    pub room: Room,
}

#[async_trait]
impl FromRequestParts<AppState> for RoomScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let r = resolve(parts, state, Level::Room).await?;
        Ok(Self {
            building: slot(r.building, "building")?,
            floor: slot(r.floor, "floor")?,
            rooms: slot(r.rooms, "rooms")?,
            room: slot(r.room, "room")?,
        })
    }
}
