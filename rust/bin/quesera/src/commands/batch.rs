//! `quesera batch ...`

use anyhow::Result;
use clap::Subcommand;
use production::{
    money_display, stage_progress, Batch, BatchPatch, BatchStatus, NewBatch, ProductionService,
    StageState, STAGES,
};
use serde::Serialize;

use super::print_json;

#[derive(Subcommand, Debug)]
pub enum BatchAction {
    /// List batches, newest first.
    List,

    /// Show one batch with its estimated value and stage strip.
    Get { id: String },

    /// Register a new batch.
    Create {
        #[arg(long)]
        product: String,
        /// Production date (YYYY-MM-DD, default today).
        #[arg(long, default_value = "")]
        date: String,
        /// Finished weight in kg.
        #[arg(long)]
        weight: Option<String>,
        /// Milk input in liters.
        #[arg(long)]
        milk: Option<String>,
        #[arg(long, default_value = "")]
        operator: String,
        /// Market price per kg.
        #[arg(long)]
        price: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Edit a batch. Only the given fields change.
    Update {
        id: String,
        /// Producción, En Cava, Finalizado or Vendido.
        #[arg(long, value_parser = parse_status)]
        status: Option<BatchStatus>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Print the estimated value of a batch.
    Value { id: String },

    /// Print the stage strip of a batch.
    Stages { id: String },
}

fn parse_status(s: &str) -> Result<BatchStatus, String> {
    s.parse()
}

/// A batch as shown on its detail screen.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchView {
    #[serde(flatten)]
    batch: Batch,
    estimated_value: String,
    stages: Vec<StageView>,
}

#[derive(Serialize)]
struct StageView {
    name: &'static str,
    state: StageState,
}

fn stages(status: BatchStatus) -> Vec<StageView> {
    STAGES
        .into_iter()
        .zip(stage_progress(status))
        .map(|(name, state)| StageView { name, state })
        .collect()
}

fn view(service: &ProductionService, batch: Batch) -> BatchView {
    BatchView {
        estimated_value: money_display(service.store().estimated_value(&batch)),
        stages: stages(batch.status),
        batch,
    }
}

pub async fn run(service: &ProductionService, action: BatchAction) -> Result<()> {
    match action {
        BatchAction::List => print_json(&service.list()?),
        BatchAction::Get { id } => print_json(&view(service, service.get(&id)?)),
        BatchAction::Create {
            product,
            date,
            weight,
            milk,
            operator,
            price,
            notes,
        } => {
            let input = NewBatch {
                product_name: product,
                production_date: date,
                weight,
                milk_liters: milk,
                operator,
                unit_price: price,
                notes,
            };
            let batch = service.create(input).await?;
            print_json(&view(service, batch))
        }
        BatchAction::Update {
            id,
            status,
            weight,
            price,
            notes,
        } => {
            let patch = BatchPatch {
                status,
                weight,
                unit_price: price,
                notes,
                ..Default::default()
            };
            let batch = service.update(&id, patch).await?;
            print_json(&view(service, batch))
        }
        BatchAction::Value { id } => {
            let batch = service.get(&id)?;
            print_json(&serde_json::json!({
                "id": batch.id,
                "estimatedValue": money_display(service.store().estimated_value(&batch)),
            }))
        }
        BatchAction::Stages { id } => print_json(&stages(service.get(&id)?.status)),
    }
}
