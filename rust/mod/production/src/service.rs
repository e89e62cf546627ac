//! Save path used by the registration and edit flows.

use std::sync::Arc;

use quesera_core::{Latency, ServiceError};
use tracing::debug;

use crate::model::{Batch, BatchPatch, NewBatch};
use crate::store::BatchStore;

/// Wraps a [`BatchStore`] with the simulated save latency and the
/// submit-time presence check. Reads go straight to the store.
pub struct ProductionService {
    store: Arc<BatchStore>,
    latency: Latency,
}

impl ProductionService {
    pub fn new(store: Arc<BatchStore>, latency: Latency) -> Self {
        Self { store, latency }
    }

    pub fn store(&self) -> &BatchStore {
        &self.store
    }

    /// Whether the registration form may be submitted: milk input and weight
    /// must both be filled in. Their numeric content is not checked.
    pub fn is_submittable(input: &NewBatch) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&input.milk_liters) && filled(&input.weight)
    }

    pub fn list(&self) -> Result<Vec<Batch>, ServiceError> {
        self.store.list()
    }

    pub fn get(&self, id: &str) -> Result<Batch, ServiceError> {
        self.store.get(id)
    }

    /// Submit a registration. Rejected up front if the form is incomplete.
    pub async fn create(&self, input: NewBatch) -> Result<Batch, ServiceError> {
        if !Self::is_submittable(&input) {
            return Err(ServiceError::Validation(
                "milk input and weight are required".into(),
            ));
        }
        self.latency.wait().await;
        self.store.create(input)
    }

    /// Submit an edit. An empty patch is a no-op read.
    pub async fn update(&self, id: &str, patch: BatchPatch) -> Result<Batch, ServiceError> {
        if patch.is_empty() {
            debug!("empty patch for batch {}, nothing to save", id);
            return self.store.get(id);
        }
        self.latency.wait().await;
        self.store.update(id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BatchStatus;
    use quesera_kv::MemoryStore;
    use std::time::Duration;

    fn service(latency: Latency) -> ProductionService {
        let store = Arc::new(BatchStore::new(Arc::new(MemoryStore::new())));
        ProductionService::new(store, latency)
    }

    fn input() -> NewBatch {
        NewBatch {
            product_name: "Queso Fresco".into(),
            production_date: "2024-05-17".into(),
            weight: Some("1250".into()),
            milk_liters: Some("12000".into()),
            operator: "Marta".into(),
            unit_price: None,
            notes: String::new(),
        }
    }

    #[test]
    fn submittable_requires_both_inputs() {
        assert!(ProductionService::is_submittable(&input()));
        assert!(!ProductionService::is_submittable(&NewBatch { weight: None, ..input() }));
        assert!(!ProductionService::is_submittable(&NewBatch {
            milk_liters: Some("  ".into()),
            ..input()
        }));
        // Presence only: text that won't parse still submits.
        assert!(ProductionService::is_submittable(&NewBatch {
            weight: Some("abc".into()),
            ..input()
        }));
    }

    #[tokio::test]
    async fn incomplete_form_is_rejected_without_writing() {
        let svc = service(Latency::none());
        let err = svc.create(NewBatch { weight: None, ..input() }).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert!(svc.list().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn save_waits_for_latency() {
        let svc = service(Latency::new(Duration::from_secs(1)));
        let start = tokio::time::Instant::now();

        let b = svc.create(input()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));

        let updated = svc
            .update(&b.id, BatchPatch { status: Some(BatchStatus::Finished), ..Default::default() })
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(svc.get(&b.id).unwrap(), updated);
    }

    #[tokio::test]
    async fn empty_patch_reads_back() {
        let svc = service(Latency::none());
        let b = svc.create(input()).await.unwrap();
        let same = svc.update(&b.id, BatchPatch::default()).await.unwrap();
        assert_eq!(same, b);
        assert!(svc.update("ghost", BatchPatch::default()).await.unwrap_err().is_not_found());
    }
}
