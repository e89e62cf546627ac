use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("slots");

/// Open the slot table inside one write transaction, run the body against it
/// and commit. Errors inside the body must already be `KVError`.
macro_rules! write_txn {
    ($db:expr, |$table:ident| $body:block) => {{
        let txn = $db.begin_write().map_err(KVError::storage)?;
        {
            #[allow(unused_mut)]
            let mut $table = txn.open_table(TABLE).map_err(KVError::storage)?;
            $body
        }
        txn.commit().map_err(KVError::storage)
    }};
}

/// RedbStore persists slots in a single redb table. Every write is its own
/// transaction, so a slot overwrite is atomic. No key is read-only.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(KVError::storage)?;

        // Create the table up front so reads on a fresh file don't fail.
        write_txn!(db, |_table| {})?;
        debug!("RedbStore: opened {:?}", path);
        Ok(Self { db: Arc::new(db) })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = txn.open_table(TABLE).map_err(KVError::storage)?;
        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        write_txn!(self.db, |table| {
            table.insert(key, value).map_err(KVError::storage)?;
        })
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = txn.open_table(TABLE).map_err(KVError::storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(KVError::storage)? {
            let (key, value) = entry.map_err(KVError::storage)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_string(), value.value().to_vec()));
        }
        Ok(results)
    }

    fn is_readonly(&self, _key: &str) -> bool {
        false
    }
}
