//! The analytical query compiler: {metrics, dimensions, filters} to one
//! validated SQL statement.
//!
//! Caller-supplied names never reach the statement text directly; they
//! resolve through the catalog or compilation fails naming the offending key.

use serde_json::Value;

use crate::config::CuboConfig;
use crate::error::{CuboError, Result};
use crate::models::{
    CubeQuery, DimensionCategory, DimensionDefinition, FilterCondition, FilterOp, Intent,
};
use crate::registry::SemanticCatalog;
use crate::sql::{render_literal, render_upper_literal};

/// Temporal filter value meaning "the most recent period with data".
pub const LATEST_PERIOD: &str = "MAX";

/// Synthetic window-total column attached to unaggregated listings.
pub const TOTAL_ROWS_COLUMN: &str = "total_rows";

#[derive(Debug, Default)]
pub struct QueryCompiler;

impl QueryCompiler {
    pub fn compile(
        &self,
        catalog: &SemanticCatalog,
        intent: Intent,
        query: &CubeQuery,
        config: &CuboConfig,
    ) -> Result<String> {
        if query.metrics.is_empty() && query.dimensions.is_empty() {
            return Err(CuboError::MalformedRequest(
                "query requires at least one metric or dimension".to_string(),
            ));
        }

        let mut select = Vec::new();
        for key in &query.dimensions {
            let dim = catalog.dimension(key)?;
            select.push(format!("{} AS {}", dim.expression, dim.key));
        }
        for key in &query.metrics {
            let metric = catalog.metric(key)?;
            let expr = metric
                .expression
                .replace("{table}", &catalog.fact_table)
                .replace(
                    "{fallback_headcount}",
                    &config.legacy.fallback_headcount.to_string(),
                );
            select.push(format!("{expr} AS {}", metric.key));
        }
        // Listings are capped for display; carry the true total alongside.
        if query.metrics.is_empty() {
            select.push(format!("COUNT(*) OVER () AS {TOTAL_ROWS_COLUMN}"));
        }

        let mut conditions: Vec<String> = catalog.mandatory_filters().to_vec();
        for default in catalog.defaults_for(intent) {
            if self.default_suppressed(
                catalog,
                default.dimension.as_str(),
                &default.unless_filtered,
                query,
            ) {
                continue;
            }
            let dim = catalog.dimension(&default.dimension)?;
            conditions.push(self.render_condition(catalog, dim, FilterOp::Eq, &default.value));
        }
        for filter in &query.filters {
            let dim = catalog.dimension(&filter.dimension)?;
            conditions.push(self.render_condition(catalog, dim, filter.op, &filter.value));
        }

        let mut sql = format!(
            "SELECT {} FROM {}",
            select.join(", "),
            catalog.fact_table
        );
        if !conditions.is_empty() {
            sql.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }

        // Detail listings (dimensions only) must not aggregate.
        if !query.dimensions.is_empty() && !query.metrics.is_empty() {
            let ordinals: Vec<String> =
                (1..=query.dimensions.len()).map(|i| i.to_string()).collect();
            sql.push_str(&format!(" GROUP BY {}", ordinals.join(", ")));
        }

        if let Some(order) = self.order_clause(catalog, query)? {
            sql.push_str(&format!(" ORDER BY {order}"));
        }

        let limit = query
            .limit
            .unwrap_or(config.query.default_row_limit)
            .min(config.query.max_row_limit);
        sql.push_str(&format!(" LIMIT {limit}"));

        Ok(sql)
    }

    fn default_suppressed(
        &self,
        catalog: &SemanticCatalog,
        dimension: &str,
        unless_filtered: &[String],
        query: &CubeQuery,
    ) -> bool {
        query.filters.iter().any(|f| {
            let key = catalog.canonical(&f.dimension);
            key == catalog.canonical(dimension)
                || unless_filtered.iter().any(|u| catalog.canonical(u) == key)
        })
    }

    /// Trend queries sort by the time axis; rankings sort by the first
    /// metric, descending.
    fn order_clause(
        &self,
        catalog: &SemanticCatalog,
        query: &CubeQuery,
    ) -> Result<Option<String>> {
        let Some(first) = query.dimensions.first() else {
            return Ok(None);
        };
        let dim = catalog.dimension(first)?;
        if dim.category == DimensionCategory::Temporal {
            return Ok(Some("1 ASC".to_string()));
        }
        if !query.metrics.is_empty() {
            return Ok(Some(format!("{} DESC", query.dimensions.len() + 1)));
        }
        Ok(Some("1 ASC".to_string()))
    }

    fn render_condition(
        &self,
        catalog: &SemanticCatalog,
        dim: &DimensionDefinition,
        op: FilterOp,
        value: &Value,
    ) -> String {
        if let Value::Array(items) = value {
            return self.render_in_list(
                dim,
                items,
                matches!(op, FilterOp::NotIn | FilterOp::Neq),
            );
        }
        match op {
            FilterOp::In => self.render_in_list(dim, std::slice::from_ref(value), false),
            FilterOp::NotIn => self.render_in_list(dim, std::slice::from_ref(value), true),
            FilterOp::Eq | FilterOp::Neq => self.render_equality(catalog, dim, op, value),
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
                let symbol = match op {
                    FilterOp::Gt => ">",
                    FilterOp::Gte => ">=",
                    FilterOp::Lt => "<",
                    _ => "<=",
                };
                format!("{} {symbol} {}", dim.expression, render_literal(value))
            }
        }
    }

    fn render_equality(
        &self,
        catalog: &SemanticCatalog,
        dim: &DimensionDefinition,
        op: FilterOp,
        value: &Value,
    ) -> String {
        let symbol = if op == FilterOp::Neq { "<>" } else { "=" };
        match value {
            Value::String(s)
                if s == LATEST_PERIOD && dim.category == DimensionCategory::Temporal =>
            {
                format!(
                    "{} {symbol} (SELECT MAX({}) FROM {})",
                    dim.expression, dim.expression, catalog.fact_table
                )
            }
            Value::String(_) => format!(
                "UPPER({}) {symbol} {}",
                dim.expression,
                render_upper_literal(value)
            ),
            Value::Null => {
                let check = if op == FilterOp::Neq {
                    "IS NOT NULL"
                } else {
                    "IS NULL"
                };
                format!("{} {check}", dim.expression)
            }
            other => format!("{} {symbol} {}", dim.expression, render_literal(other)),
        }
    }

    fn render_in_list(&self, dim: &DimensionDefinition, items: &[Value], negated: bool) -> String {
        let has_strings = items.iter().any(Value::is_string);
        let keyword = if negated { "NOT IN" } else { "IN" };
        if has_strings {
            let literals: Vec<String> = items.iter().map(render_upper_literal).collect();
            format!(
                "UPPER({}) {keyword} ({})",
                dim.expression,
                literals.join(", ")
            )
        } else {
            let literals: Vec<String> = items.iter().map(|v| render_literal(v)).collect();
            format!("{} {keyword} ({})", dim.expression, literals.join(", "))
        }
    }
}

/// The caller filter on the given dimension, if any (alias-aware).
pub fn filter_on<'a>(
    catalog: &SemanticCatalog,
    query: &'a CubeQuery,
    dimension: &str,
) -> Option<&'a FilterCondition> {
    let key = catalog.canonical(dimension);
    query
        .filters
        .iter()
        .find(|f| catalog.canonical(&f.dimension) == key)
}
