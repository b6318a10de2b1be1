//! HTTP server for Habitat.
//!
//! Exposes buildings, their floors and the rooms on each floor as a REST
//! API. Every route that names an entity in its path runs the resolver chain
//! for its depth first (see [`resolve`]); handlers only run once all the
//! ancestors they depend on exist.

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod resolve;
pub mod router;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::{BackendKind, ServerConfig, StoreConfig, DEFAULT_PORT};
pub use error::{ApiError, ServerError, ServerResult};
pub use extract::{BuildingScope, FloorScope, RoomScope};
pub use resolve::{
    BuildingResolver, FloorResolver, Level, PathIds, Resolution, ResolveError, Resolver,
    ResolverChain, RoomResolver, StepOutcome,
};
pub use router::{build_router, AppState};
pub use server::HabitatServer;
