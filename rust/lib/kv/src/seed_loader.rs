use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::KVError;
use crate::overlay::OverlayKV;
use crate::traits::KVStore;

/// SeedLoader fills the read-only layer of an [`OverlayKV`] with demo records
/// shipped in the data directory. Each namespace is one subdirectory:
///
/// ```text
/// data-dir/
/// └── seeds/
///     └── batch/
///         ├── demo-01.json   → seed:batch:demo-01
///         └── demo-02.json   → seed:batch:demo-02
/// ```
///
/// File contents are stored as-is; the owning store parses them.
pub struct SeedLoader;

/// Prefix shared by every seed key.
pub const SEED_PREFIX: &str = "seed:";

impl SeedLoader {
    /// Load every `seeds/<namespace>/*.json` file under `data_dir`.
    /// Returns the number of entries loaded. A missing directory loads nothing.
    pub fn load<DB: KVStore>(data_dir: &Path, overlay: &OverlayKV<DB>) -> Result<usize, KVError> {
        let seeds_dir = data_dir.join("seeds");
        if !seeds_dir.is_dir() {
            debug!("SeedLoader: {:?} does not exist, skipping", seeds_dir);
            return Ok(0);
        }

        let mut count = 0;
        for entry in fs::read_dir(&seeds_dir).map_err(KVError::storage)? {
            let path = entry.map_err(KVError::storage)?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(namespace) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            count += Self::load_namespace(&path, namespace, overlay)?;
        }

        debug!("SeedLoader: loaded {} entries from {:?}", count, seeds_dir);
        Ok(count)
    }

    fn load_namespace<DB: KVStore>(
        dir: &Path,
        namespace: &str,
        overlay: &OverlayKV<DB>,
    ) -> Result<usize, KVError> {
        let mut count = 0;
        for entry in fs::read_dir(dir).map_err(KVError::storage)? {
            let path = entry.map_err(KVError::storage)?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                warn!("SeedLoader: ignoring non-JSON file {:?}", path);
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let key = format!("{}{}:{}", SEED_PREFIX, namespace, stem);
            let data = fs::read(&path).map_err(KVError::storage)?;
            overlay.insert_seed(key, data);
            count += 1;
        }
        Ok(count)
    }
}
