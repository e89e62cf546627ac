use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quesera_kv::{KVStore, MemoryStore, OverlayKV, RedbStore, SeedLoader};
use serde::Deserialize;
use tracing::info;

use crate::ServiceError;

/// Default simulated save latency, in milliseconds.
pub const DEFAULT_LATENCY_MS: u64 = 500;

/// Storage and store settings shared by every Quesera entry point.
///
/// Built from an optional TOML file and then overridden by command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Directory holding `seeds/` and, by default, the redb file.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/quesera.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk.
    pub in_memory: bool,

    /// Artificial delay applied before every create/update.
    pub latency: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            in_memory: false,
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
        }
    }
}

/// On-disk TOML shape.
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/quesera"
/// db = "/var/lib/quesera/quesera.redb"
/// memory = false
///
/// [store]
/// latency_ms = 500
/// ```
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    storage: StorageSection,
    #[serde(default)]
    store: StoreSection,
}

#[derive(Debug, Default, Deserialize)]
struct StorageSection {
    data_dir: Option<PathBuf>,
    db: Option<PathBuf>,
    #[serde(default)]
    memory: bool,
}

#[derive(Debug, Default, Deserialize)]
struct StoreSection {
    latency_ms: Option<u64>,
}

impl ServiceConfig {
    /// Parse a TOML document. Missing tables and keys fall back to defaults.
    pub fn from_toml(content: &str) -> Result<Self, ServiceError> {
        let file: FileConfig = toml::from_str(content)
            .map_err(|e| ServiceError::Validation(format!("invalid config: {}", e)))?;
        Ok(Self {
            data_dir: file.storage.data_dir,
            db_path: file.storage.db,
            in_memory: file.storage.memory,
            latency: Duration::from_millis(file.store.latency_ms.unwrap_or(DEFAULT_LATENCY_MS)),
        })
    }

    /// Load from a file, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Storage(format!("read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Resolve the redb database path, falling back to `{data_dir}/quesera.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join("quesera.redb"))
                .unwrap_or_else(|| PathBuf::from("quesera.redb"))
        })
    }

    /// Open the configured backend with the seed layer loaded on top.
    pub fn open_store(&self) -> Result<Arc<dyn KVStore>, ServiceError> {
        if self.in_memory {
            return Ok(Arc::new(self.with_seeds(MemoryStore::new())?));
        }

        let db_path = self.resolve_db_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServiceError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }
        info!("Opening store at {}", db_path.display());
        Ok(Arc::new(self.with_seeds(RedbStore::open(&db_path)?)?))
    }

    fn with_seeds<DB: KVStore>(&self, db: DB) -> Result<OverlayKV<DB>, ServiceError> {
        let overlay = OverlayKV::new(db);
        if let Some(dir) = &self.data_dir {
            let n = SeedLoader::load(dir, &overlay)?;
            if n > 0 {
                info!("Loaded {} seed records from {}", n, dir.display());
            }
        }
        Ok(overlay)
    }
}
