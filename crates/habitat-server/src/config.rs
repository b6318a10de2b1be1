use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use habitat_store::{FsBackend, HierarchyStore, InMemoryBackend, KvBackend, PersistentStore};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 1410;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file; absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("unable to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }
}

/// Which key-value backend holds the hierarchy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    Fs,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Fs => "fs",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "fs" => Ok(Self::Fs),
            other => Err(ServerError::Config(format!(
                "unsupported store backend '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Root directory of the `fs` backend.
    pub data_dir: PathBuf,
    /// Key prefix every stored entry lives under.
    pub base_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Fs,
            data_dir: PathBuf::from("data/habitat"),
            base_path: "habitat".to_string(),
        }
    }
}

impl StoreConfig {
    /// Open the configured backend and wrap it in a hierarchy store.
    pub fn open(&self) -> ServerResult<Arc<dyn HierarchyStore>> {
        let backend: Arc<dyn KvBackend> = match self.backend {
            BackendKind::Memory => Arc::new(InMemoryBackend::new()),
            BackendKind::Fs => Arc::new(FsBackend::open(&self.data_dir)?),
        };
        tracing::info!(
            backend = %self.backend,
            base_path = %self.base_path,
            "store opened"
        );
        Ok(Arc::new(PersistentStore::new(&self.base_path, backend)))
    }
}
