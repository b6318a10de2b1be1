use std::io::Write;
use std::net::SocketAddr;

use anyhow::Context;
use colored::Colorize;
use habitat_server::{HabitatServer, ServerConfig};
use habitat_store::HierarchyStore;
use habitat_types::{Building, Buildings, Entity, Floor, Floors, Rooms, START_TIME};
use serde_json::{json, Map, Value};

use crate::cli::{Cli, Command, InspectArgs, OutputFormat, StoreArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(&args),
        Command::Inspect(args) => cmd_inspect(&args, cli.format),
        Command::Config(args) => cmd_config(&args),
    }
}

/// The config file (or defaults) with command-line flags applied on top.
pub fn effective_config(args: &StoreArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let ip = args.bind_address.unwrap_or_else(|| config.bind_addr.ip());
    let port = args.http_port.unwrap_or_else(|| config.bind_addr.port());
    config.bind_addr = SocketAddr::new(ip, port);
    if let Some(backend) = args.store_backend {
        config.store.backend = backend.into();
    }
    if let Some(dir) = &args.data_dir {
        config.store.data_dir = dir.clone();
    }
    if let Some(base) = &args.store_base_path {
        config.store.base_path = base.clone();
    }
    Ok(config)
}

fn cmd_serve(args: &StoreArgs) -> anyhow::Result<()> {
    let config = effective_config(args)?;
    let server = HabitatServer::from_config(config.clone())?;
    println!(
        "{} Habitat server on {} (store: {}, base path: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.store.backend.to_string().cyan(),
        config.store.base_path.yellow()
    );
    let runtime = tokio::runtime::Runtime::new().context("unable to start async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_inspect(args: &InspectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = effective_config(&args.store)?;
    let store = config.store.open()?;
    let selection = Selection {
        building: args.building.clone(),
        floor: args.floor.clone(),
        room: args.room.clone(),
    };
    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Text => render_tree(store.as_ref(), &selection, &mut out)?,
        OutputFormat::Json => {
            let tree = hierarchy_json(store.as_ref(), &selection)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&tree)?)?;
        }
    }
    Ok(())
}

fn cmd_config(args: &StoreArgs) -> anyhow::Result<()> {
    let config = effective_config(args)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Part of the hierarchy to inspect; `None` selects every entry of a level.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
}

impl Selection {
    fn buildings(&self, store: &dyn HierarchyStore) -> anyhow::Result<Buildings> {
        match &self.building {
            Some(id) => {
                let building = store.find_building(id)?;
                Ok(Buildings::from([(building.id(), building)]))
            }
            None => Ok(store.buildings()?),
        }
    }

    fn floors(&self, store: &dyn HierarchyStore, building: &Building) -> anyhow::Result<Floors> {
        match &self.floor {
            Some(id) => {
                let floor = store.find_floor(building, id)?;
                Ok(Floors::from([(floor.id(), floor)]))
            }
            None => Ok(store.floors(building)?),
        }
    }

    fn rooms(&self, store: &dyn HierarchyStore, floor: &Floor) -> anyhow::Result<Rooms> {
        match &self.room {
            Some(id) => {
                let room = store.find_room(floor, id)?;
                Ok(Rooms::from([(room.id(), room)]))
            }
            None => Ok(store.rooms(floor)?),
        }
    }
}

/// Print the selected buildings with their floors and rooms as an indented
/// tree.
pub fn render_tree(
    store: &dyn HierarchyStore,
    selection: &Selection,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let status = store.uptime()?;
    if let Some(started) = status.get(START_TIME) {
        writeln!(out, "{} {}", "started:".dimmed(), started)?;
    }
    let buildings = selection.buildings(store)?;
    if buildings.is_empty() {
        writeln!(out, "No buildings.")?;
        return Ok(());
    }
    for (id, building) in &buildings {
        writeln!(
            out,
            "{} {} ({}, {})",
            id.yellow().bold(),
            building.name(),
            building.lat,
            building.lon
        )?;
        for (floor_id, floor) in &selection.floors(store, building)? {
            writeln!(
                out,
                "  {} {} [level {}]",
                floor_id.cyan(),
                floor.name(),
                floor.level
            )?;
            for (room_id, room) in &selection.rooms(store, floor)? {
                writeln!(
                    out,
                    "    {} {} [{}]",
                    room_id.green(),
                    room.name(),
                    room.direction
                )?;
            }
        }
    }
    Ok(())
}

/// The selected part of the hierarchy as nested JSON.
pub fn hierarchy_json(store: &dyn HierarchyStore, selection: &Selection) -> anyhow::Result<Value> {
    let mut buildings = Map::new();
    for building in selection.buildings(store)?.into_values() {
        let mut floors = Map::new();
        for floor in selection.floors(store, &building)?.into_values() {
            let rooms = selection.rooms(store, &floor)?;
            floors.insert(floor.id(), json!({ "floor": floor, "rooms": rooms }));
        }
        buildings.insert(building.id(), json!({ "building": building, "floors": floors }));
    }
    Ok(Value::Object(buildings))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cli::StoreBackend;
    use habitat_server::BackendKind;
    use habitat_store::{InMemoryBackend, PersistentStore};
    use habitat_types::{Direction, Room};

    fn seeded() -> PersistentStore {
        let store = PersistentStore::new("habitat", Arc::new(InMemoryBackend::new()));
        let building = Building::new("atlantis tower", "", 1.0, 2.0);
        let floor = Floor::new(&building, "ground floor", "", 1);
        let room = Room::new(&floor, "east lobby", "", Direction::East);
        store.upsert_building(&building).unwrap();
        store.upsert_floor(&floor).unwrap();
        store.upsert_room(&room).unwrap();
        store
    }

    #[test]
    fn defaults_without_flags() {
        let config = effective_config(&StoreArgs::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("habitat.toml");
        std::fs::write(
            &path,
            "bind_addr = \"127.0.0.1:9000\"\n[store]\nbase_path = \"from-file\"\n",
        )
        .unwrap();
        let args = StoreArgs {
            config: Some(path),
            http_port: Some(8080),
            store_backend: Some(StoreBackend::Memory),
            ..StoreArgs::default()
        };
        let config = effective_config(&args).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.store.backend, BackendKind::Memory);
        assert_eq!(config.store.base_path, "from-file");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = StoreArgs {
            config: Some("/nonexistent/habitat.toml".into()),
            ..StoreArgs::default()
        };
        assert!(effective_config(&args).is_err());
    }

    #[test]
    fn tree_lists_every_level() {
        let store = seeded();
        let mut out = Vec::new();
        render_tree(&store, &Selection::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("atlantis-tower"));
        assert!(text.contains("ground-floor"));
        assert!(text.contains("east-lobby"));
        assert!(text.contains("level 1"));
    }

    #[test]
    fn empty_tree() {
        let store = PersistentStore::new("habitat", Arc::new(InMemoryBackend::new()));
        let mut out = Vec::new();
        render_tree(&store, &Selection::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("started:"));
        assert!(text.ends_with("No buildings.\n"));
    }

    #[test]
    fn json_nests_rooms_under_floors() {
        let tree = hierarchy_json(&seeded(), &Selection::default()).unwrap();
        let room = &tree["atlantis-tower"]["floors"]["ground-floor"]["rooms"]["east-lobby"];
        assert_eq!(room["direction"], "east");
        assert_eq!(tree["atlantis-tower"]["building"]["lat"], 1.0);
    }

    #[test]
    fn selection_narrows_to_one_building() {
        let store = seeded();
        store
            .upsert_building(&Building::new("harbour view", "", 3.0, 4.0))
            .unwrap();
        let selection = Selection {
            building: Some("harbour-view".into()),
            ..Selection::default()
        };
        let tree = hierarchy_json(&store, &selection).unwrap();
        let ids: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(ids, ["harbour-view"]);
    }

    #[test]
    fn selection_narrows_to_one_floor() {
        let store = seeded();
        let building = store.find_building("atlantis-tower").unwrap();
        store
            .upsert_floor(&Floor::new(&building, "roof deck", "", 9))
            .unwrap();
        let selection = Selection {
            building: Some("atlantis-tower".into()),
            floor: Some("roof-deck".into()),
            ..Selection::default()
        };
        let mut out = Vec::new();
        render_tree(&store, &selection, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("roof-deck"));
        assert!(!text.contains("ground-floor"));
    }

    #[test]
    fn unknown_selection_is_not_found() {
        let store = seeded();
        let selection = Selection {
            building: Some("ghost-tower".into()),
            ..Selection::default()
        };
        let err = hierarchy_json(&store, &selection).unwrap_err();
        assert_eq!(err.to_string(), "building 'ghost-tower' not found");

        let selection = Selection {
            building: Some("atlantis-tower".into()),
            floor: Some("basement".into()),
            ..Selection::default()
        };
        let err = hierarchy_json(&store, &selection).unwrap_err();
        assert_eq!(err.to_string(), "floor 'basement' not found");

        let selection = Selection {
            building: Some("atlantis-tower".into()),
            floor: Some("ground-floor".into()),
            room: Some("attic".into()),
        };
        let err = hierarchy_json(&store, &selection).unwrap_err();
        assert_eq!(err.to_string(), "room 'attic' not found");
    }

    #[test]
    fn selection_narrows_to_one_room() {
        let store = seeded();
        let floor = store
            .find_floor(&store.find_building("atlantis-tower").unwrap(), "ground-floor")
            .unwrap();
        store
            .upsert_room(&Room::new(&floor, "west wing", "", Direction::West))
            .unwrap();
        let selection = Selection {
            building: Some("atlantis-tower".into()),
            floor: Some("ground-floor".into()),
            room: Some("west-wing".into()),
        };
        let tree = hierarchy_json(&store, &selection).unwrap();
        let rooms = tree["atlantis-tower"]["floors"]["ground-floor"]["rooms"]
            .as_object()
            .unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms["west-wing"]["direction"], "west");
    }
}
