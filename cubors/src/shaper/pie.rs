use serde_json::Value;

use crate::blocks::{ChartKind, ChartSeries, VisualBlock};
use crate::error::{CuboError, Result};
use crate::executor::{value_key, value_to_f64, QueryResult};
use crate::shaper::{declutter, display_label, ShapeContext};

/// Pie/donut. Multiple metrics compare metric totals (one slice per metric);
/// a single metric with a dimension shows its distribution across the
/// primary axis.
pub fn build(result: &QueryResult, ctx: &ShapeContext<'_>) -> Result<VisualBlock> {
    if ctx.query.metrics.len() > 1 {
        return metric_comparison(result, ctx);
    }
    distribution(result, ctx)
}

fn metric_comparison(result: &QueryResult, ctx: &ShapeContext<'_>) -> Result<VisualBlock> {
    let mut labels = Vec::with_capacity(ctx.query.metrics.len());
    let mut data = Vec::with_capacity(ctx.query.metrics.len());
    for key in &ctx.query.metrics {
        let metric = ctx.catalog.metric(key)?;
        let total: f64 = result
            .rows
            .iter()
            .map(|row| value_to_f64(row.get(&metric.key).unwrap_or(&Value::Null)))
            .sum();
        labels.push(metric.label.clone());
        data.push(total);
    }
    Ok(VisualBlock::Chart {
        kind: ChartKind::Pie,
        labels,
        series: vec![ChartSeries {
            label: "Total".to_string(),
            data,
            format: None,
        }],
        tooltip_series: Vec::new(),
    })
}

fn distribution(result: &QueryResult, ctx: &ShapeContext<'_>) -> Result<VisualBlock> {
    let Some(metric_key) = ctx.query.metrics.first() else {
        return Err(CuboError::MalformedRequest(
            "pie requires at least one metric".to_string(),
        ));
    };
    let Some(dim_key) = ctx.query.dimensions.first() else {
        return Err(CuboError::MalformedRequest(
            "distribution pie requires a dimension".to_string(),
        ));
    };
    let metric = ctx.catalog.metric(metric_key)?;
    let dim = ctx.catalog.dimension(dim_key)?;

    // Sum per distinct value, preserving result order.
    let mut axis: Vec<String> = Vec::new();
    let mut totals: Vec<f64> = Vec::new();
    for row in &result.rows {
        let key = value_key(row.get(&dim.key).unwrap_or(&Value::Null));
        let value = value_to_f64(row.get(&metric.key).unwrap_or(&Value::Null));
        match axis.iter().position(|k| *k == key) {
            Some(idx) => totals[idx] += value,
            None => {
                axis.push(key);
                totals.push(value);
            }
        }
    }

    let labels: Vec<String> = axis.iter().map(|k| display_label(dim, k)).collect();
    let series = vec![ChartSeries {
        label: metric.label.clone(),
        data: totals,
        format: Some(metric.format.clone()),
    }];
    let (series, tooltip_series) = declutter::split(series);
    Ok(VisualBlock::Chart {
        kind: ChartKind::Pie,
        labels,
        series,
        tooltip_series,
    })
}
