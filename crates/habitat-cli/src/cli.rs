use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use habitat_server::BackendKind;

#[derive(Parser)]
#[command(
    name = "habitat",
    about = "Habitat: a REST API over buildings, floors and rooms",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(StoreArgs),
    /// Print the stored building hierarchy
    Inspect(InspectArgs),
    /// Print the effective configuration
    Config(StoreArgs),
}

/// Store backends selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreBackend {
    Memory,
    Fs,
}

impl From<StoreBackend> for BackendKind {
    fn from(backend: StoreBackend) -> Self {
        match backend {
            StoreBackend::Memory => BackendKind::Memory,
            StoreBackend::Fs => BackendKind::Fs,
        }
    }
}

/// Flags layered over the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct StoreArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Address to bind the server to
    #[arg(long)]
    pub bind_address: Option<IpAddr>,
    /// Port to listen on
    #[arg(long)]
    pub http_port: Option<u16>,
    /// Key-value backend holding the hierarchy
    #[arg(long, value_enum)]
    pub store_backend: Option<StoreBackend>,
    /// Root directory of the fs backend
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Key prefix for every stored entry
    #[arg(long)]
    pub store_base_path: Option<String>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct InspectArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Only show this building
    #[arg(long)]
    pub building: Option<String>,
    /// Only show this floor of the selected building
    #[arg(long, requires = "building")]
    pub floor: Option<String>,
    /// Only show this room of the selected floor
    #[arg(long, requires = "floor")]
    pub room: Option<String>,
}
