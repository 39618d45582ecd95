use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unit attached to a metric's numeric format. Ratio-like units drive
/// axis decluttering and table scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Count,
    Percentage,
    Currency,
    Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericFormat {
    pub unit: UnitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: u8,
}

impl NumericFormat {
    pub fn count() -> Self {
        NumericFormat {
            unit: UnitKind::Count,
            symbol: None,
            decimals: 0,
        }
    }

    pub fn percentage(decimals: u8) -> Self {
        NumericFormat {
            unit: UnitKind::Percentage,
            symbol: Some("%".to_string()),
            decimals,
        }
    }

    pub fn currency(symbol: &str) -> Self {
        NumericFormat {
            unit: UnitKind::Currency,
            symbol: Some(symbol.to_string()),
            decimals: 2,
        }
    }

    pub fn ratio(decimals: u8) -> Self {
        NumericFormat {
            unit: UnitKind::Ratio,
            symbol: None,
            decimals,
        }
    }

    /// Percentage and ratio series share an axis scale; counts and
    /// currency do not mix with them.
    pub fn is_ratio_like(&self) -> bool {
        matches!(self.unit, UnitKind::Percentage | UnitKind::Ratio)
    }
}

/// A metric: a named aggregation expression over the fact table.
///
/// `expression` is a vetted SQL fragment; it may reference `{table}` for the
/// fully qualified fact table (correlated subqueries) and
/// `{fallback_headcount}` for the configured legacy headcount constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub key: String,
    pub expression: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub format: NumericFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionCategory {
    Organizational,
    Temporal,
    Segmentation,
    Personal,
    Location,
    Financial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortHint {
    Numeric,
    Temporal,
    #[default]
    Default,
}

/// A dimension: a named grouping/filtering expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionDefinition {
    pub key: String,
    pub expression: String,
    pub category: DimensionCategory,
    pub label: String,
    /// Raw value to display label, e.g. "1" -> "Ene".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub value_labels: BTreeMap<String, String>,
    #[serde(default)]
    pub sort: SortHint,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Personally identifying columns are masked before table output.
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCondition {
    pub dimension: String,
    pub op: FilterOp,
    pub value: Value,
}

impl FilterCondition {
    pub fn eq(dimension: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterCondition {
            dimension: dimension.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn in_list(dimension: impl Into<String>, values: Vec<Value>) -> Self {
        FilterCondition {
            dimension: dimension.into(),
            op: FilterOp::In,
            value: Value::Array(values),
        }
    }

    /// Multi-value filters drive zero-fill completeness and series-axis
    /// promotion.
    pub fn list_values(&self) -> Option<&Vec<Value>> {
        match &self.value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Caller query shape category; affects default filters and shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Snapshot,
    Trend,
    Comparison,
    Listing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualHint {
    KpiRow,
    LineChart,
    BarChart,
    PieChart,
    Table,
    SmartAuto,
}

/// A validated analytical request. Dimension order is meaningful: the first
/// dimension is the primary axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CubeQuery {
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    pub limit: Option<u32>,
}

/// A per-intent business default, applied only when the caller did not
/// already filter on any of the suppressing dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefault {
    pub intent: Intent,
    pub dimension: String,
    pub value: Value,
    #[serde(default)]
    pub unless_filtered: Vec<String>,
}

/// Request metadata supplied by the conversational layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestMeta {
    pub title: String,
}
