//! The executor boundary: the warehouse client lives outside this crate and
//! is reached through `QueryExecutor`.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::compiler::TOTAL_ROWS_COLUMN;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub name: String,
}

/// Tabular result: ordered rows of column name to scalar, column order
/// matching the SELECT list. Transformations build new results rather than
/// mutating in place.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Map<String, Value>>,
    /// True row count behind a display cap, when the statement carried a
    /// window total.
    pub total_rows: Option<u64>,
}

impl QueryResult {
    pub fn from_rows(columns: &[&str], rows: Vec<Map<String, Value>>) -> Self {
        QueryResult {
            columns: columns
                .iter()
                .map(|name| ColumnMeta {
                    name: name.to_string(),
                })
                .collect(),
            rows,
            total_rows: None,
        }
    }

    /// Extract the synthetic window-total column into `total_rows`.
    pub fn with_window_total(mut self) -> Self {
        if let Some(first) = self.rows.first() {
            if let Some(total) = first.get(TOTAL_ROWS_COLUMN).and_then(Value::as_u64) {
                self.total_rows = Some(total);
            }
        }
        self
    }
}

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run one statement. Implementations own timeout, retry policy and the
    /// scanned-bytes budget; failures surface as `CuboError::Execution`.
    async fn execute(&self, sql: &str) -> Result<QueryResult>;
}

/// Coerce a result cell to a number; non-numeric cells count as zero.
pub fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Canonical string key for a result cell, used to match axis values across
/// rows and filters. Integral floats drop the trailing `.0` so `2024`,
/// `2024.0` and `"2024"` all agree.
pub fn value_key(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{}", f as i64)
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
