use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Coarse production stage. Any value can be set by an edit; there is no
/// enforced ordering between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BatchStatus {
    #[serde(rename = "Producción")]
    Production,
    #[default]
    #[serde(rename = "En Cava")]
    Aging,
    #[serde(rename = "Finalizado")]
    Finished,
    #[serde(rename = "Vendido")]
    Sold,
}

impl BatchStatus {
    pub const ALL: [BatchStatus; 4] = [
        BatchStatus::Production,
        BatchStatus::Aging,
        BatchStatus::Finished,
        BatchStatus::Sold,
    ];

    /// The label shown to users and stored on disk.
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Production => "Producción",
            BatchStatus::Aging => "En Cava",
            BatchStatus::Finished => "Finalizado",
            BatchStatus::Sold => "Vendido",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BatchStatus {
    type Err = String;

    /// Accepts the stored label, case-insensitively, with or without the
    /// accent, and the short forms `produccion`, `cava`, `finalizado`, `vendido`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace('ó', "o");
        match norm.as_str() {
            "produccion" => Ok(BatchStatus::Production),
            "en cava" | "en-cava" | "cava" => Ok(BatchStatus::Aging),
            "finalizado" => Ok(BatchStatus::Finished),
            "vendido" => Ok(BatchStatus::Sold),
            _ => Err(format!("unknown batch status '{}'", s)),
        }
    }
}

/// Batch — one production lot of cheese.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Opaque unique identifier (UUIDv4, no dashes; seed records use their file stem).
    #[serde(default)]
    pub id: String,

    /// Product name (e.g. "Queso Manchego").
    #[serde(default)]
    pub product_name: String,

    /// Production date, `YYYY-MM-DD`.
    #[serde(default)]
    pub production_date: String,

    /// Human-facing lot code (e.g. "L-240517-003").
    #[serde(default)]
    pub code: String,

    /// Finished weight in kg. NaN when the input did not parse.
    #[serde(default, deserialize_with = "number_or_nan")]
    pub weight: f64,

    /// Milk input in liters. NaN when the input did not parse.
    #[serde(default, deserialize_with = "number_or_nan")]
    pub milk_liters: f64,

    /// Yield percentage rendered to 2 decimals, or `"--"`.
    #[serde(default, rename = "yield")]
    pub yield_percent: String,

    #[serde(default)]
    pub operator: String,

    #[serde(default)]
    pub status: BatchStatus,

    /// Market price per kg. Absent means no price; a stored `null` is a price
    /// that did not parse.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "price_or_nan"
    )]
    pub unit_price: Option<f64>,

    #[serde(default)]
    pub notes: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

impl PartialEq for Batch {
    // NaN inputs compare equal to themselves so a stored copy equals the original.
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }
        self.id == other.id
            && self.product_name == other.product_name
            && self.production_date == other.production_date
            && self.code == other.code
            && same(self.weight, other.weight)
            && same(self.milk_liters, other.milk_liters)
            && self.yield_percent == other.yield_percent
            && self.operator == other.operator
            && self.status == other.status
            && match (self.unit_price, other.unit_price) {
                (Some(a), Some(b)) => same(a, b),
                (a, b) => a.is_none() && b.is_none(),
            }
            && self.notes == other.notes
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
    }
}

/// Registration form input. Numeric fields arrive as raw text and are
/// coerced, not validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBatch {
    pub product_name: String,
    /// Empty means today.
    #[serde(default)]
    pub production_date: String,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub milk_liters: Option<String>,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub unit_price: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Edit form input. Every `Some` field replaces the stored value wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milk_liters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BatchStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BatchPatch {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.production_date.is_none()
            && self.weight.is_none()
            && self.milk_liters.is_none()
            && self.operator.is_none()
            && self.status.is_none()
            && self.unit_price.is_none()
            && self.notes.is_none()
    }

    /// Whether applying this patch changes an input of the yield.
    pub(crate) fn touches_yield(&self) -> bool {
        self.weight.is_some() || self.milk_liters.is_some()
    }
}

/// JSON has no NaN: serde_json writes it as `null`, so read `null` back as NaN.
fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// `None` is never written, so a present `null` price was NaN.
fn price_or_nan<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    number_or_nan(deserializer).map(Some)
}
