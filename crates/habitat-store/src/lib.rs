//! Hierarchical persistence for Habitat.
//!
//! This crate maps the building → floor → room hierarchy onto a flat
//! key-value backend. It is the only place in Habitat that builds backend
//! keys or talks to a backend.
//!
//! # Key Layout
//!
//! ```text
//! <root>/buildings                      Buildings collection (JSON)
//! <root>/<building>/floors              Floors collection of a building
//! <root>/<building>/<floor>/rooms       Rooms collection of a floor
//! <root>/<building>[/<floor>[/<room>]]  subtree owned by an entity
//! <root>/status/server                  {"startTime": ...}
//! ```
//!
//! # Backends
//!
//! All backends implement the [`KvBackend`] trait:
//!
//! - [`InMemoryBackend`] -- `BTreeMap`-based backend for tests and ephemeral runs
//! - [`FsBackend`] -- one file per key, one directory per subtree
//!
//! # Design Rules
//!
//! 1. A collection is one key holding the full JSON map of a parent's children.
//! 2. Single-item writes are read-modify-write of the whole collection and are
//!    NOT atomic: concurrent writers to one collection can lose updates.
//! 3. A missing collection reads as empty; a missing status reads as "now".
//! 4. Deleting an entity rewrites the parent collection first, then removes
//!    the entity's subtree. A failure in the second step is reported even
//!    though the first step is already persisted.
//! 5. Backend errors are propagated verbatim and never retried.

pub mod backend;
pub mod error;
pub mod fs;
pub mod hierarchy;
pub mod keys;
pub mod memory;
pub mod persistent;

pub use backend::{validate_key, KvBackend};
pub use error::{KvError, StoreError, StoreResult};
pub use fs::FsBackend;
pub use hierarchy::HierarchyStore;
pub use keys::KeyLayout;
pub use memory::InMemoryBackend;
pub use persistent::PersistentStore;
