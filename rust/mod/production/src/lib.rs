//! Cheese-production batch records.
//!
//! [`BatchStore`] owns the persisted batch collection and its derived fields
//! (yield, estimated value). [`ProductionService`] is the save path used by the
//! registration and edit flows; it adds the simulated latency and the
//! submit-time presence check.

pub mod calc;
pub mod model;
pub mod service;
pub mod stage;
pub mod store;

pub use calc::{
    coerce_number, display_code, estimated_value, money_display, yield_display, YIELD_PLACEHOLDER,
};
pub use model::{Batch, BatchPatch, BatchStatus, NewBatch};
pub use service::ProductionService;
pub use stage::{stage_progress, StageState, STAGES};
pub use store::{BatchStore, BATCHES_SLOT, SEED_BATCH_PREFIX};
