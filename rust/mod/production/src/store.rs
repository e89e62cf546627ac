//! BatchStore — the persisted batch collection.
//!
//! The whole collection lives in one slot ([`BATCHES_SLOT`]) as a JSON array,
//! newest first. Every create/update rewrites the entire slot. Demo batches
//! shipped as seed records (`seed:batch:<id>`) are visible through `get` and
//! `list` and are copied into the slot the first time they are edited.

use std::collections::HashSet;
use std::sync::Arc;

use quesera_core::{new_id, now_rfc3339, today, ServiceError};
use quesera_kv::KVStore;
use tracing::{debug, info, warn};

use crate::calc::{coerce_number, display_code, estimated_value, yield_display};
use crate::model::{Batch, BatchPatch, BatchStatus, NewBatch};

/// Slot holding the serialized batch collection.
pub const BATCHES_SLOT: &str = "quesera:batches";

/// Key prefix of demo batches in the seed layer.
pub const SEED_BATCH_PREFIX: &str = "seed:batch:";

pub struct BatchStore {
    kv: Arc<dyn KVStore>,
}

impl BatchStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    // ── Reads ──

    /// All known batches, most recently created first. Seed batches that were
    /// never saved follow the persisted ones.
    pub fn list(&self) -> Result<Vec<Batch>, ServiceError> {
        let mut batches = self.load()?;
        let persisted: HashSet<String> = batches.iter().map(|b| b.id.clone()).collect();
        batches.extend(self.seeds()?.into_iter().filter(|s| !persisted.contains(&s.id)));
        Ok(batches)
    }

    /// A single batch by id, persisted copy first, then seed.
    pub fn get(&self, id: &str) -> Result<Batch, ServiceError> {
        if let Some(batch) = self.load()?.into_iter().find(|b| b.id == id) {
            return Ok(batch);
        }
        self.seed(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("batch '{}' not found", id)))
    }

    /// Number of demo batches available in the seed layer.
    pub fn seed_count(&self) -> Result<usize, ServiceError> {
        Ok(self.kv.scan(SEED_BATCH_PREFIX)?.len())
    }

    /// weight × unit price; 0 without a price.
    pub fn estimated_value(&self, batch: &Batch) -> f64 {
        estimated_value(batch)
    }

    // ── Writes ──

    /// Register a new batch from raw form input.
    ///
    /// Numeric fields are coerced, not rejected: a missing value becomes 0 and
    /// an unparsable one NaN, either of which leaves the yield as the
    /// placeholder. The batch starts "En Cava" and goes to the front.
    pub fn create(&self, input: NewBatch) -> Result<Batch, ServiceError> {
        let mut batches = self.load()?;

        let mut taken: HashSet<String> = batches.iter().map(|b| b.id.clone()).collect();
        taken.extend(self.seeds()?.into_iter().map(|s| s.id));
        let mut id = new_id();
        while taken.contains(&id) {
            id = new_id();
        }

        let weight = coerce_number(input.weight.as_deref());
        let milk_liters = coerce_number(input.milk_liters.as_deref());
        let unit_price = input
            .unit_price
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| coerce_number(Some(s)));
        if weight.is_nan() || milk_liters.is_nan() {
            warn!("batch {}: non-numeric weight or milk input, yield left blank", id);
        }

        let production_date = if input.production_date.trim().is_empty() {
            today()
        } else {
            input.production_date.trim().to_string()
        };
        let now = now_rfc3339();

        let batch = Batch {
            code: display_code(&production_date, batches.len() + 1),
            id,
            product_name: input.product_name.trim().to_string(),
            production_date,
            weight,
            milk_liters,
            yield_percent: yield_display(weight, milk_liters),
            operator: input.operator.trim().to_string(),
            status: BatchStatus::Aging,
            unit_price,
            notes: input.notes,
            created_at: now.clone(),
            updated_at: now,
        };

        batches.insert(0, batch.clone());
        self.persist(&batches)?;
        info!("Batch {} ({}) created", batch.code, batch.id);
        Ok(batch)
    }

    /// Apply an edit to a batch and persist the collection.
    ///
    /// Named fields replace the stored values; `id`, `code` and `createdAt`
    /// are never changed. A seed batch is upserted into the collection.
    pub fn update(&self, id: &str, patch: BatchPatch) -> Result<Batch, ServiceError> {
        let mut batches = self.load()?;

        let merged = match batches.iter().position(|b| b.id == id) {
            Some(pos) => {
                let merged = apply_patch(&batches[pos], &patch);
                batches[pos] = merged.clone();
                merged
            }
            None => {
                let seed = self
                    .seed(id)?
                    .ok_or_else(|| ServiceError::NotFound(format!("batch '{}' not found", id)))?;
                let merged = apply_patch(&seed, &patch);
                batches.insert(0, merged.clone());
                info!("Seed batch {} saved into the collection", id);
                merged
            }
        };

        self.persist(&batches)?;
        debug!("Batch {} updated", id);
        Ok(merged)
    }

    // ── Slot I/O ──

    fn load(&self) -> Result<Vec<Batch>, ServiceError> {
        match self.kv.get(BATCHES_SLOT)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Internal(format!("deserialize {}: {}", BATCHES_SLOT, e))),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, batches: &[Batch]) -> Result<(), ServiceError> {
        let bytes = serde_json::to_vec(batches)?;
        self.kv.set(BATCHES_SLOT, &bytes)?;
        Ok(())
    }

    fn seed(&self, id: &str) -> Result<Option<Batch>, ServiceError> {
        let key = format!("{}{}", SEED_BATCH_PREFIX, id);
        Ok(self
            .kv
            .get(&key)?
            .and_then(|bytes| parse_seed(&key, &bytes)))
    }

    fn seeds(&self) -> Result<Vec<Batch>, ServiceError> {
        Ok(self
            .kv
            .scan(SEED_BATCH_PREFIX)?
            .into_iter()
            .filter_map(|(key, bytes)| parse_seed(&key, &bytes))
            .collect())
    }
}

/// Parse a seed record. The id always comes from the key so `get`/`update`
/// find what `list` shows; a missing yield is computed from the inputs. A
/// malformed seed is skipped.
fn parse_seed(key: &str, bytes: &[u8]) -> Option<Batch> {
    let mut batch: Batch = match serde_json::from_slice(bytes) {
        Ok(b) => b,
        Err(e) => {
            warn!("skipping malformed seed {}: {}", key, e);
            return None;
        }
    };
    batch.id = key.trim_start_matches(SEED_BATCH_PREFIX).to_string();
    if batch.yield_percent.is_empty() {
        batch.yield_percent = yield_display(batch.weight, batch.milk_liters);
    }
    Some(batch)
}

fn apply_patch(current: &Batch, patch: &BatchPatch) -> Batch {
    let mut merged = current.clone();
    if let Some(v) = &patch.product_name {
        merged.product_name = v.clone();
    }
    if let Some(v) = &patch.production_date {
        merged.production_date = v.clone();
    }
    if let Some(v) = patch.weight {
        merged.weight = v;
    }
    if let Some(v) = patch.milk_liters {
        merged.milk_liters = v;
    }
    if let Some(v) = &patch.operator {
        merged.operator = v.clone();
    }
    if let Some(v) = patch.status {
        merged.status = v;
    }
    if let Some(v) = patch.unit_price {
        merged.unit_price = Some(v);
    }
    if let Some(v) = &patch.notes {
        merged.notes = v.clone();
    }
    if patch.touches_yield() {
        merged.yield_percent = yield_display(merged.weight, merged.milk_liters);
    }
    merged.updated_at = now_rfc3339();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use quesera_kv::{MemoryStore, OverlayKV};

    fn store() -> BatchStore {
        BatchStore::new(Arc::new(MemoryStore::new()))
    }

    fn store_with_seed() -> BatchStore {
        let overlay = OverlayKV::new(MemoryStore::new());
        overlay.insert_seed(
            "seed:batch:demo-01".into(),
            r#"{"productName":"Queso Manchego","productionDate":"2024-03-02","code":"L-240302-900",
                "weight":400,"milkLiters":4000,"operator":"Demo","status":"Producción","unitPrice":18}"#
                .as_bytes()
                .to_vec(),
        );
        BatchStore::new(Arc::new(overlay))
    }

    fn reference_input() -> NewBatch {
        NewBatch {
            product_name: "Queso Fresco".into(),
            production_date: "2024-05-17".into(),
            weight: Some("1250".into()),
            milk_liters: Some("12000".into()),
            operator: "Marta".into(),
            unit_price: Some("14.5".into()),
            notes: String::new(),
        }
    }

    #[test]
    fn create_computes_derived_fields() {
        let s = store();
        let b = s.create(reference_input()).unwrap();
        assert_eq!(b.yield_percent, "10.42");
        assert_eq!(b.status, BatchStatus::Aging);
        assert_eq!(b.code, "L-240517-001");
        assert_eq!(b.id.len(), 32);
        assert_eq!(s.estimated_value(&b), 1250.0 * 14.5);
    }

    #[test]
    fn create_puts_newest_first() {
        let s = store();
        let first = s.create(reference_input()).unwrap();
        let before = s.list().unwrap().len();

        let second = s.create(NewBatch {
            product_name: "Queso Azul".into(),
            ..reference_input()
        })
        .unwrap();

        let all = s.list().unwrap();
        assert_eq!(all.len(), before + 1);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert_ne!(first.id, second.id);
        assert_eq!(second.code, "L-240517-002");
    }

    #[test]
    fn create_without_inputs_uses_placeholder() {
        let s = store();
        let zero_milk = s
            .create(NewBatch {
                milk_liters: Some("0".into()),
                ..reference_input()
            })
            .unwrap();
        assert_eq!(zero_milk.yield_percent, "--");

        let no_weight = s
            .create(NewBatch {
                weight: None,
                ..reference_input()
            })
            .unwrap();
        assert_eq!(no_weight.yield_percent, "--");
        assert_eq!(no_weight.weight, 0.0);
    }

    #[test]
    fn create_with_garbage_number_keeps_nan() {
        let s = store();
        let b = s
            .create(NewBatch {
                weight: Some("mucho".into()),
                ..reference_input()
            })
            .unwrap();
        assert_eq!(b.yield_percent, "--");
        assert!(s.get(&b.id).unwrap().weight.is_nan());
        assert!(s.estimated_value(&b).is_nan());
    }

    #[test]
    fn create_without_price_is_worth_zero() {
        let s = store();
        let b = s
            .create(NewBatch {
                unit_price: Some("  ".into()),
                ..reference_input()
            })
            .unwrap();
        assert!(b.unit_price.is_none());
        assert_eq!(s.estimated_value(&b), 0.0);
    }

    #[test]
    fn create_defaults_date_to_today() {
        let s = store();
        let b = s
            .create(NewBatch {
                production_date: String::new(),
                ..reference_input()
            })
            .unwrap();
        assert_eq!(b.production_date, today());
    }

    #[test]
    fn update_status_leaves_everything_else() {
        let s = store();
        let b = s.create(reference_input()).unwrap();

        s.update(
            &b.id,
            BatchPatch {
                status: Some(BatchStatus::Finished),
                ..Default::default()
            },
        )
        .unwrap();

        let got = s.get(&b.id).unwrap();
        assert_eq!(got.status, BatchStatus::Finished);
        assert_eq!(
            Batch {
                status: b.status,
                updated_at: b.updated_at.clone(),
                ..got
            },
            b
        );
    }

    #[test]
    fn update_weight_recomputes_yield() {
        let s = store();
        let b = s.create(reference_input()).unwrap();
        let updated = s
            .update(
                &b.id,
                BatchPatch {
                    weight: Some(1200.0),
                    unit_price: Some(10.0),
                    notes: Some("Corteza firme".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.yield_percent, "10.00");
        assert_eq!(updated.code, b.code);
        assert_eq!(updated.created_at, b.created_at);
        assert_eq!(s.estimated_value(&updated), 12000.0);
    }

    #[test]
    fn update_carries_nan_inputs() {
        let s = store();
        let b = s.create(reference_input()).unwrap();
        let updated = s
            .update(
                &b.id,
                BatchPatch {
                    weight: Some(f64::NAN),
                    unit_price: Some(f64::NAN),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.weight.is_nan());
        assert!(updated.unit_price.is_some_and(f64::is_nan));
        assert_eq!(updated.yield_percent, "--");

        let got = s.get(&b.id).unwrap();
        assert!(got.weight.is_nan());
        assert!(got.unit_price.is_some_and(f64::is_nan));
        assert!(s.estimated_value(&got).is_nan());
        assert_eq!(got.milk_liters, 12000.0);
    }

    #[test]
    fn garbage_price_stays_nan_after_reload() {
        let s = store();
        let b = s
            .create(NewBatch {
                unit_price: Some("caro".into()),
                ..reference_input()
            })
            .unwrap();
        assert!(s.estimated_value(&b).is_nan());

        let got = s.get(&b.id).unwrap();
        assert!(got.unit_price.is_some_and(f64::is_nan));
        assert!(s.estimated_value(&got).is_nan());
        assert_eq!(got, b);
    }

    #[test]
    fn sequential_updates_last_write_wins() {
        let s = store();
        let b = s.create(reference_input()).unwrap();
        s.update(&b.id, BatchPatch { notes: Some("first".into()), ..Default::default() })
            .unwrap();
        s.update(&b.id, BatchPatch { notes: Some("second".into()), status: Some(BatchStatus::Sold), ..Default::default() })
            .unwrap();

        let got = s.get(&b.id).unwrap();
        assert_eq!(got.notes, "second");
        assert_eq!(got.status, BatchStatus::Sold);
        assert_eq!(s.list().unwrap().len(), 1);
    }

    #[test]
    fn update_unknown_is_not_found() {
        let s = store();
        let err = s
            .update("ghost", BatchPatch { notes: Some("x".into()), ..Default::default() })
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(s.get("ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn seed_is_listed_and_readable() {
        let s = store_with_seed();
        assert_eq!(s.seed_count().unwrap(), 1);

        let seed = s.get("demo-01").unwrap();
        assert_eq!(seed.id, "demo-01");
        assert_eq!(seed.yield_percent, "10.00");
        assert_eq!(seed.status, BatchStatus::Production);

        let created = s.create(reference_input()).unwrap();
        let ids: Vec<String> = s.list().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![created.id, "demo-01".to_string()]);
    }

    #[test]
    fn update_of_seed_upserts() {
        let s = store_with_seed();
        let created = s.create(reference_input()).unwrap();

        let saved = s
            .update(
                "demo-01",
                BatchPatch {
                    status: Some(BatchStatus::Aging),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(saved.status, BatchStatus::Aging);
        assert_eq!(saved.code, "L-240302-900");

        // Now persisted at the front and not listed twice.
        let all = s.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "demo-01");
        assert_eq!(all[1].id, created.id);
        assert_eq!(s.get("demo-01").unwrap().status, BatchStatus::Aging);

        // A second edit updates in place.
        s.update("demo-01", BatchPatch { notes: Some("ok".into()), ..Default::default() })
            .unwrap();
        assert_eq!(s.list().unwrap().len(), 2);
    }

    #[test]
    fn collection_persists_across_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quesera.redb");
        let id = {
            let kv: Arc<dyn KVStore> = Arc::new(quesera_kv::RedbStore::open(&path).unwrap());
            BatchStore::new(kv).create(reference_input()).unwrap().id
        };
        let kv: Arc<dyn KVStore> = Arc::new(quesera_kv::RedbStore::open(&path).unwrap());
        assert_eq!(BatchStore::new(kv).get(&id).unwrap().yield_percent, "10.42");
    }

    #[test]
    fn seed_id_comes_from_key() {
        let overlay = OverlayKV::new(MemoryStore::new());
        overlay.insert_seed(
            "seed:batch:demo-02".into(),
            r#"{"id":"otro","productName":"Queso Azul","weight":50,"milkLiters":500}"#
                .as_bytes()
                .to_vec(),
        );
        let s = BatchStore::new(Arc::new(overlay));

        let ids: Vec<String> = s.list().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["demo-02".to_string()]);
        assert_eq!(s.get("demo-02").unwrap().product_name, "Queso Azul");
        assert!(s.get("otro").unwrap_err().is_not_found());

        let saved = s
            .update("demo-02", BatchPatch { notes: Some("ok".into()), ..Default::default() })
            .unwrap();
        assert_eq!(saved.id, "demo-02");
    }

    #[test]
    fn malformed_seed_is_skipped() {
        let overlay = OverlayKV::new(MemoryStore::new());
        overlay.insert_seed("seed:batch:bad".into(), b"not json".to_vec());
        let s = BatchStore::new(Arc::new(overlay));
        assert!(s.list().unwrap().is_empty());
        assert!(s.get("bad").unwrap_err().is_not_found());
    }
}
