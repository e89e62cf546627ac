//! Derived-field arithmetic for batches.

use crate::model::Batch;

/// Rendered in place of a yield that cannot be computed.
pub const YIELD_PLACEHOLDER: &str = "--";

/// Coerce a raw form value into a number.
///
/// Missing or blank input is 0. Anything else that does not parse becomes NaN
/// and is carried through silently; callers guard before display.
pub fn coerce_number(raw: Option<&str>) -> f64 {
    match raw.map(str::trim) {
        None | Some("") => 0.0,
        Some(s) => s.replace(',', ".").parse().unwrap_or(f64::NAN),
    }
}

/// Yield = weight / milk × 100, rendered to 2 decimals.
///
/// Zero, NaN, or missing inputs render as [`YIELD_PLACEHOLDER`].
pub fn yield_display(weight: f64, milk_liters: f64) -> String {
    let usable = |x: f64| x.is_finite() && x > 0.0;
    if !usable(weight) || !usable(milk_liters) {
        return YIELD_PLACEHOLDER.to_string();
    }
    format!("{:.2}", weight / milk_liters * 100.0)
}

/// Estimated total value = weight × unit price; 0 when no price is set.
pub fn estimated_value(batch: &Batch) -> f64 {
    match batch.unit_price {
        Some(price) => batch.weight * price,
        None => 0.0,
    }
}

/// Render a currency amount to 2 decimals, or the placeholder if it is NaN.
pub fn money_display(amount: f64) -> String {
    if amount.is_finite() {
        format!("{:.2}", amount)
    } else {
        YIELD_PLACEHOLDER.to_string()
    }
}

/// Lot code `L-YYMMDD-NNN` from the production date and a per-store sequence.
///
/// Only the digits of the date are used; a date that yields fewer than six
/// digits is taken as-is.
pub fn display_code(production_date: &str, seq: usize) -> String {
    let digits: String = production_date.chars().filter(char::is_ascii_digit).collect();
    let short = if digits.len() >= 8 {
        &digits[2..8]
    } else {
        digits.as_str()
    };
    format!("L-{}-{:03}", short, seq)
}
