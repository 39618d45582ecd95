//! Final envelope assembly: summary text, truncation notice and non-finite
//! number defusion.

use serde_json::Value;

use crate::blocks::{VisualBlock, VisualPackage};
use crate::error::Result;
use crate::executor::value_key;
use crate::models::CubeQuery;
use crate::registry::SemanticCatalog;

pub fn assemble(
    blocks: Vec<VisualBlock>,
    title: &str,
    query: &CubeQuery,
    catalog: &SemanticCatalog,
    returned: usize,
    total: Option<u64>,
) -> VisualPackage {
    if blocks.is_empty() && returned == 0 {
        return VisualPackage {
            summary: format!("{title}: sin datos para los criterios indicados."),
            content: Vec::new(),
        };
    }

    let mut summary = title.to_string();
    if let Some(context) = filter_context(query, catalog) {
        summary.push_str(&format!(" ({context})"));
    }
    summary.push_str(&format!(" — {returned} registros"));
    if let Some(total) = total {
        if total > returned as u64 {
            summary.push_str(&format!(
                ". Mostrando {returned} de {total} registros; acote la consulta con \
                 más filtros (por ejemplo, división o periodo) para ver el resto"
            ));
        }
    }
    summary.push('.');

    VisualPackage {
        summary,
        content: blocks,
    }
}

/// "División: Ventas | Año: 2024, 2025" from the caller's filters.
fn filter_context(query: &CubeQuery, catalog: &SemanticCatalog) -> Option<String> {
    if query.filters.is_empty() {
        return None;
    }
    let parts: Vec<String> = query
        .filters
        .iter()
        .map(|filter| {
            let label = catalog
                .dimension(&filter.dimension)
                .map(|d| d.label.clone())
                .unwrap_or_else(|_| filter.dimension.clone());
            let rendered = match &filter.value {
                Value::Array(items) => items
                    .iter()
                    .map(value_key)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => value_key(other),
            };
            format!("{label}: {rendered}")
        })
        .collect();
    Some(parts.join(" | "))
}

/// Recursively replace non-finite numbers with null. JSON must never carry
/// NaN or Infinity past this boundary.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Number(n) => {
            let finite = n.as_f64().map(f64::is_finite).unwrap_or(true);
            if finite {
                Value::Number(n)
            } else {
                Value::Null
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, sanitize(v))).collect())
        }
        other => other,
    }
}

impl VisualPackage {
    /// Serialize to a JSON value with non-finite numbers defused.
    pub fn to_json(&self) -> Result<Value> {
        Ok(sanitize(serde_json::to_value(self)?))
    }
}
