//! Presentation-ready visual structures. One closed union, no dual
//! list-or-map payload shapes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::NumericFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiItem {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub format: NumericFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<NumericFormat>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualBlock {
    Text {
        text: String,
    },
    Kpi {
        items: Vec<KpiItem>,
    },
    Chart {
        kind: ChartKind,
        labels: Vec<String>,
        series: Vec<ChartSeries>,
        /// Series excluded from axis scaling but kept for tooltips.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tooltip_series: Vec<ChartSeries>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Map<String, Value>>,
    },
}

/// The response envelope handed back to the conversational layer.
#[derive(Debug, Clone, Serialize)]
pub struct VisualPackage {
    pub summary: String,
    pub content: Vec<VisualBlock>,
}

impl VisualPackage {
    pub fn degraded(summary: impl Into<String>) -> Self {
        VisualPackage {
            summary: summary.into(),
            content: Vec::new(),
        }
    }
}
