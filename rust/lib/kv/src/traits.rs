use crate::error::KVError;

/// KVStore is the slot-oriented storage contract used by every Quesera store.
///
/// Keys are namespaced strings: `quesera:batches`, `quesera:profile`,
/// `seed:batch:demo-01`. A value is an opaque byte string, usually JSON.
/// Keys that come from the seed layer are read-only.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    /// Returns KVError::ReadOnly if the key belongs to the seed layer.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns (key, value) pairs sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    /// Check whether a key is in the read-only (seed) layer.
    fn is_readonly(&self, key: &str) -> bool;
}
