//! Backend key construction.
//!
//! Segments are joined with `/` and empty segments are dropped, so a root
//! of `"habitat/"` and `"habitat"` produce identical keys.

const BUILDINGS: &str = "buildings";
const FLOORS: &str = "floors";
const ROOMS: &str = "rooms";
const UPTIME: &str = "status/server";

/// Maps hierarchy positions onto backend keys below a configured root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyLayout {
    root: String,
}

impl KeyLayout {
    pub fn new(root: impl AsRef<str>) -> Self {
        Self {
            root: join(&[root.as_ref()]),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// `<root>/buildings`
    pub fn buildings(&self) -> String {
        join(&[&self.root, BUILDINGS])
    }

    /// `<root>/<building>` -- subtree of a building.
    pub fn building(&self, building: &str) -> String {
        join(&[&self.root, building])
    }

    /// `<root>/<building>/floors`
    pub fn floors(&self, building: &str) -> String {
        join(&[&self.root, building, FLOORS])
    }

    /// `<root>/<building>/<floor>` -- subtree of a floor.
    pub fn floor(&self, building: &str, floor: &str) -> String {
        join(&[&self.root, building, floor])
    }

    /// `<root>/<building>/<floor>/rooms`
    pub fn rooms(&self, building: &str, floor: &str) -> String {
        join(&[&self.root, building, floor, ROOMS])
    }

    /// `<root>/<building>/<floor>/<room>` -- subtree of a room.
    pub fn room(&self, building: &str, floor: &str, room: &str) -> String {
        join(&[&self.root, building, floor, room])
    }

    /// `<root>/status/server`
    pub fn uptime(&self) -> String {
        join(&[&self.root, UPTIME])
    }
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
