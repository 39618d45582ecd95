//! Zero-fill completeness: a comparison axis never silently drops a value
//! the caller explicitly asked for.
//!
//! Applies only when the primary (first) dimension carries a list-valued
//! caller filter. A fully empty result is left alone; that is the shaper's
//! "no data" case, not sparsity on an enumerated axis.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::compiler::filter_on;
use crate::error::Result;
use crate::executor::{value_key, QueryResult};
use crate::models::{CubeQuery, SortHint};
use crate::registry::SemanticCatalog;

pub fn ensure_complete(
    result: QueryResult,
    query: &CubeQuery,
    catalog: &SemanticCatalog,
) -> Result<QueryResult> {
    let Some(primary) = query.dimensions.first() else {
        return Ok(result);
    };
    let Some(filter) = filter_on(catalog, query, primary) else {
        return Ok(result);
    };
    let Some(expected) = filter.list_values() else {
        return Ok(result);
    };
    if result.rows.is_empty() {
        return Ok(result);
    }

    let dim = catalog.dimension(primary)?;
    let column = dim.key.clone();

    let actual: HashSet<String> = result
        .rows
        .iter()
        .map(|row| value_key(row.get(&column).unwrap_or(&Value::Null)))
        .collect();

    let mut rows = result.rows;
    for value in expected {
        if actual.contains(&value_key(value)) {
            continue;
        }
        let mut row = Map::new();
        row.insert(column.clone(), value.clone());
        for metric_key in &query.metrics {
            let metric = catalog.metric(metric_key)?;
            row.insert(metric.key.clone(), Value::from(0));
        }
        rows.push(row);
    }

    let numeric = matches!(dim.sort, SortHint::Numeric | SortHint::Temporal);
    rows.sort_by(|a, b| {
        let left = a.get(&column).unwrap_or(&Value::Null);
        let right = b.get(&column).unwrap_or(&Value::Null);
        compare_axis_values(left, right, numeric)
    });

    Ok(QueryResult {
        columns: result.columns,
        rows,
        total_rows: result.total_rows,
    })
}

fn compare_axis_values(left: &Value, right: &Value, numeric: bool) -> Ordering {
    if numeric {
        let l: std::result::Result<f64, _> = value_key(left).parse();
        let r: std::result::Result<f64, _> = value_key(right).parse();
        if let (Ok(l), Ok(r)) = (l, r) {
            return l.partial_cmp(&r).unwrap_or(Ordering::Equal);
        }
    }
    value_key(left).cmp(&value_key(right))
}
