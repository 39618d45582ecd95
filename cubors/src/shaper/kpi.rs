use crate::blocks::{KpiItem, VisualBlock};
use crate::error::{CuboError, Result};
use crate::executor::{value_to_f64, QueryResult};
use crate::shaper::ShapeContext;

/// One KPI item per requested metric, values taken from the sole row.
pub fn build(result: &QueryResult, ctx: &ShapeContext<'_>) -> Result<VisualBlock> {
    if ctx.query.metrics.is_empty() {
        return Err(CuboError::MalformedRequest(
            "kpi row requires at least one metric".to_string(),
        ));
    }
    let row = &result.rows[0];
    let mut items = Vec::with_capacity(ctx.query.metrics.len());
    for key in &ctx.query.metrics {
        let metric = ctx.catalog.metric(key)?;
        let value = row
            .get(&metric.key)
            .map(value_to_f64)
            .unwrap_or(0.0);
        items.push(KpiItem {
            label: metric.label.clone(),
            value,
            delta: None,
            status: None,
            format: metric.format.clone(),
        });
    }
    Ok(VisualBlock::Kpi { items })
}
