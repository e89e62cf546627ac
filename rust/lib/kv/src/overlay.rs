use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// OverlayKV stacks a read-only seed layer on top of a writable backend.
///
/// - **Seed layer** (read-only, higher priority): demo records loaded from the
///   data directory by [`SeedLoader`](crate::SeedLoader).
/// - **DB layer** (read-write): any concrete KVStore.
///
/// Reads check the seed layer first. Writes against a seed key fail with `KVError::ReadOnly`; every other key goes to the DB layer.
/// `scan` merges both layers, seed entries shadowing DB entries with the same key.
pub struct OverlayKV<DB: KVStore> {
    seed_layer: RwLock<BTreeMap<String, Vec<u8>>>,
    db: DB,
}

impl<DB: KVStore> OverlayKV<DB> {
    pub fn new(db: DB) -> Self {
        Self {
            seed_layer: RwLock::new(BTreeMap::new()),
            db,
        }
    }

    /// Insert an entry into the read-only seed layer.
    pub fn insert_seed(&self, key: String, value: Vec<u8>) {
        if let Ok(mut layer) = self.seed_layer.write() {
            layer.insert(key, value);
        }
    }

}

impl<DB: KVStore> KVStore for OverlayKV<DB> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        {
            let layer = self
                .seed_layer
                .read()
                .map_err(|_| KVError::Storage("seed layer lock poisoned".into()))?;
            if let Some(value) = layer.get(key) {
                return Ok(Some(value.clone()));
            }
        }
        self.db.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        if self.is_readonly(key) {
            return Err(KVError::ReadOnly(key.to_string()));
        }
        self.db.set(key, value)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let mut merged: BTreeMap<String, Vec<u8>> = self.db.scan(prefix)?.into_iter().collect();

        let layer = self
            .seed_layer
            .read()
            .map_err(|_| KVError::Storage("seed layer lock poisoned".into()))?;
        for (key, value) in layer.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            merged.insert(key.clone(), value.clone());
        }

        Ok(merged.into_iter().collect())
    }

    fn is_readonly(&self, key: &str) -> bool {
        self.seed_layer
            .read()
            .map(|l| l.contains_key(key))
            .unwrap_or(false)
    }
}
