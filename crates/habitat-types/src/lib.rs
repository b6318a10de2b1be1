//! Entity model for Habitat.
//!
//! Habitat describes physical space as a fixed three-level hierarchy:
//! buildings contain floors, floors contain rooms. This crate holds the value
//! types for each level together with the rules that decide whether a client
//! payload is acceptable. Every other Habitat crate depends on
//! `habitat-types`.
//!
//! # Key Types
//!
//! - [`PhysicalEntity`]: name and description shared by every level
//! - [`Building`], [`Floor`], [`Room`]: the three hierarchy levels
//! - [`Direction`]: compass orientation of a room
//! - [`Buildings`], [`Floors`], [`Rooms`]: id-keyed collections, persisted as one JSON blob each
//! - [`Status`]: server bookkeeping outside the hierarchy
//!
//! # Identity
//!
//! An entity's identity is the [`slug`] of its name. Parent links (the
//! building of a floor, the floor of a room) are structural: they are never
//! serialized and are re-attached whenever a collection is decoded.

pub mod building;
pub mod direction;
pub mod entity;
pub mod error;
pub mod floor;
pub mod room;
pub mod status;
pub mod validation;

pub use building::{decode_buildings, Building, Buildings};
pub use direction::Direction;
pub use entity::{slug, Entity, PhysicalEntity, NAME_MAX_LEN, NAME_MIN_LEN};
pub use error::TypeError;
pub use floor::{decode_floors, Floor, Floors};
pub use room::{decode_rooms, Room, Rooms};
pub use status::{Status, START_TIME};
pub use validation::ValidationErrors;
