//! Result shaping: turn a tabular result into presentation-ready blocks.

mod chart;
mod declutter;
mod kpi;
mod pie;
mod table;

use std::cmp::Ordering;

use crate::blocks::{ChartKind, VisualBlock};
use crate::error::Result;
use crate::executor::QueryResult;
use crate::format::RowFormatter;
use crate::models::{CubeQuery, DimensionCategory, DimensionDefinition, SortHint, VisualHint};
use crate::registry::SemanticCatalog;

pub struct ShapeContext<'a> {
    pub catalog: &'a SemanticCatalog,
    pub query: &'a CubeQuery,
    pub formatter: &'a dyn RowFormatter,
}

/// Decision table per hint; `SmartAuto` picks KPI for a single row and a
/// chart for many. An empty result yields no blocks at all.
pub fn shape(
    result: &QueryResult,
    hint: VisualHint,
    ctx: &ShapeContext<'_>,
) -> Result<Vec<VisualBlock>> {
    if result.rows.is_empty() {
        return Ok(Vec::new());
    }
    let block = match hint {
        VisualHint::KpiRow => kpi::build(result, ctx)?,
        VisualHint::PieChart => pie::build(result, ctx)?,
        VisualHint::LineChart => chart::build(result, ChartKind::Line, ctx)?,
        VisualHint::BarChart => chart::build(result, ChartKind::Bar, ctx)?,
        VisualHint::Table => table::build(result, ctx),
        VisualHint::SmartAuto => auto_block(result, ctx)?,
    };
    Ok(vec![block])
}

fn auto_block(result: &QueryResult, ctx: &ShapeContext<'_>) -> Result<VisualBlock> {
    if ctx.query.metrics.is_empty() {
        return Ok(table::build(result, ctx));
    }
    if result.rows.len() == 1 {
        return kpi::build(result, ctx);
    }
    if ctx.query.dimensions.is_empty() {
        return Ok(table::build(result, ctx));
    }
    let first = ctx.catalog.dimension(&ctx.query.dimensions[0])?;
    let kind = if first.category == DimensionCategory::Temporal {
        ChartKind::Line
    } else {
        ChartKind::Bar
    };
    chart::build(result, kind, ctx)
}

/// Display label for a raw axis value: missing values become
/// "Sin especificar", known values map through the catalog labels.
pub(crate) fn display_label(dim: &DimensionDefinition, raw: &str) -> String {
    if raw.is_empty() || raw == "None" || raw.eq_ignore_ascii_case("nan") || raw == "null" {
        return "Sin especificar".to_string();
    }
    dim.value_labels
        .get(raw)
        .cloned()
        .unwrap_or_else(|| raw.to_string())
}

/// Sort raw axis keys by the dimension's hint: numeric-aware for numeric and
/// temporal axes, lexicographic otherwise.
pub(crate) fn sort_axis_keys(keys: &mut [String], hint: SortHint) {
    let numeric = matches!(hint, SortHint::Numeric | SortHint::Temporal);
    keys.sort_by(|a, b| {
        if numeric {
            if let (Ok(l), Ok(r)) = (a.parse::<f64>(), b.parse::<f64>()) {
                return l.partial_cmp(&r).unwrap_or(Ordering::Equal);
            }
        }
        a.cmp(b)
    });
}
