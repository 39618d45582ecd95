//! Table formatting/masking collaborator.
//!
//! Every table row passes through a `RowFormatter` before it reaches the
//! caller: PII columns masked, dates rendered as plain `YYYY-MM-DD`, ratio
//! metrics scaled to 0-100.

use serde_json::{Map, Value};

use crate::executor::value_to_f64;
use crate::models::{DimensionCategory, UnitKind};
use crate::registry::SemanticCatalog;

pub trait RowFormatter: Send + Sync {
    fn format_table_row(
        &self,
        row: &Map<String, Value>,
        catalog: &SemanticCatalog,
    ) -> Map<String, Value>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFormatter;

impl RowFormatter for DefaultFormatter {
    fn format_table_row(
        &self,
        row: &Map<String, Value>,
        catalog: &SemanticCatalog,
    ) -> Map<String, Value> {
        let mut formatted = Map::new();
        for (column, value) in row {
            formatted.insert(column.clone(), self.format_cell(column, value, catalog));
        }
        formatted
    }
}

impl DefaultFormatter {
    fn format_cell(&self, column: &str, value: &Value, catalog: &SemanticCatalog) -> Value {
        if let Ok(dim) = catalog.dimension(column) {
            if dim.sensitive {
                return Value::String(mask(value));
            }
            if dim.category == DimensionCategory::Temporal {
                if let Value::String(s) = value {
                    return Value::String(plain_date(s));
                }
            }
            return value.clone();
        }
        if let Ok(metric) = catalog.metric(column) {
            if metric.format.unit == UnitKind::Ratio {
                let scaled = value_to_f64(value) * 100.0;
                let rounded = round_to(scaled, metric.format.decimals);
                return serde_json::Number::from_f64(rounded)
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
            }
        }
        value.clone()
    }
}

fn mask(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let cut = raw.len().saturating_sub(3);
    if cut == 0 || !raw.is_char_boundary(cut) {
        return "***".to_string();
    }
    // Keep the tail so rows stay distinguishable without exposing the value.
    format!("***{}", &raw[cut..])
}

/// Trim timestamps down to `YYYY-MM-DD`.
fn plain_date(s: &str) -> String {
    let date = s.split(&['T', ' ']).next().unwrap_or(s);
    date.to_string()
}

fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
