use quesera_core::ServiceError;
use quesera_kv::KVStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a single-record slot, or the record's default if it was never written.
pub(crate) fn read<T: DeserializeOwned + Default>(
    kv: &dyn KVStore,
    key: &str,
) -> Result<T, ServiceError> {
    match kv.get(key)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Internal(format!("deserialize {}: {}", key, e))),
        None => Ok(T::default()),
    }
}

/// Overwrite a single-record slot.
pub(crate) fn write<T: Serialize>(kv: &dyn KVStore, key: &str, value: &T) -> Result<(), ServiceError> {
    let bytes = serde_json::to_vec(value)?;
    kv.set(key, &bytes)?;
    Ok(())
}
