use serde_json::Value;

use crate::blocks::{ChartKind, ChartSeries, VisualBlock};
use crate::error::{CuboError, Result};
use crate::executor::{value_key, value_to_f64, QueryResult};
use crate::models::SortHint;
use crate::shaper::{declutter, display_label, sort_axis_keys, ShapeContext};

/// Line/bar chart. With a second dimension, one series per distinct value of
/// that dimension (grouped mode); otherwise one series per requested metric
/// (multi-metric mode).
pub fn build(
    result: &QueryResult,
    kind: ChartKind,
    ctx: &ShapeContext<'_>,
) -> Result<VisualBlock> {
    let Some(first) = ctx.query.dimensions.first() else {
        return Err(CuboError::MalformedRequest(
            "chart requires at least one dimension".to_string(),
        ));
    };
    if ctx.query.metrics.is_empty() {
        return Err(CuboError::MalformedRequest(
            "chart requires at least one metric".to_string(),
        ));
    }
    let d0 = ctx.catalog.dimension(first)?;

    // Distinct primary-axis values in result order. Synthetic zero-fill rows
    // carry only their own axis column; rows without a primary value do not
    // create an axis point.
    let mut axis: Vec<String> = Vec::new();
    for row in &result.rows {
        let Some(value) = row.get(&d0.key) else {
            continue;
        };
        let key = value_key(value);
        if !axis.contains(&key) {
            axis.push(key);
        }
    }
    if matches!(d0.sort, SortHint::Numeric | SortHint::Temporal) {
        sort_axis_keys(&mut axis, d0.sort);
    }
    let labels: Vec<String> = axis.iter().map(|k| display_label(d0, k)).collect();

    let series = match ctx.query.dimensions.get(1) {
        Some(second) => {
            let d1 = ctx.catalog.dimension(second)?;
            let metric = ctx.catalog.metric(&ctx.query.metrics[0])?;

            let mut series_keys: Vec<String> = Vec::new();
            for row in &result.rows {
                let Some(value) = row.get(&d1.key) else {
                    continue;
                };
                let key = value_key(value);
                if !series_keys.contains(&key) {
                    series_keys.push(key);
                }
            }
            sort_axis_keys(&mut series_keys, d1.sort);

            let mut series = Vec::with_capacity(series_keys.len());
            for series_key in &series_keys {
                let data: Vec<f64> = axis
                    .iter()
                    .map(|axis_key| {
                        result
                            .rows
                            .iter()
                            .find(|row| {
                                value_key(row.get(&d0.key).unwrap_or(&Value::Null)) == *axis_key
                                    && value_key(row.get(&d1.key).unwrap_or(&Value::Null))
                                        == *series_key
                            })
                            .map(|row| {
                                value_to_f64(row.get(&metric.key).unwrap_or(&Value::Null))
                            })
                            .unwrap_or(0.0)
                    })
                    .collect();
                series.push(ChartSeries {
                    label: display_label(d1, series_key),
                    data,
                    format: Some(metric.format.clone()),
                });
            }
            series
        }
        None => {
            let mut series = Vec::with_capacity(ctx.query.metrics.len());
            for key in &ctx.query.metrics {
                let metric = ctx.catalog.metric(key)?;
                let data: Vec<f64> = result
                    .rows
                    .iter()
                    .map(|row| value_to_f64(row.get(&metric.key).unwrap_or(&Value::Null)))
                    .collect();
                series.push(ChartSeries {
                    label: metric.label.clone(),
                    data,
                    format: Some(metric.format.clone()),
                });
            }
            series
        }
    };

    let (series, tooltip_series) = declutter::split(series);
    Ok(VisualBlock::Chart {
        kind,
        labels,
        series,
        tooltip_series,
    })
}
