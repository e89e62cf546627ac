//! The three-stage progress strip shown on a batch.
//!
//! Purely a view of [`BatchStatus`]; nothing here advances a batch.

use serde::Serialize;

use crate::model::BatchStatus;

/// Stage names, in order.
pub const STAGES: [&str; 3] = ["Producción", "Prensado y Salado", "Maduración"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Done,
    Active,
    Pending,
}

pub fn stage_progress(status: BatchStatus) -> [StageState; 3] {
    use StageState::*;
    match status {
        BatchStatus::Production => [Active, Pending, Pending],
        BatchStatus::Aging => [Done, Done, Active],
        BatchStatus::Finished | BatchStatus::Sold => [Done, Done, Done],
    }
}
