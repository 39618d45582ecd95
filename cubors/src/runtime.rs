//! Request pipeline: compile, execute, complete, shape, assemble.
//!
//! The upstream caller is an automated translator, so failures come back as
//! an inspectable degraded envelope rather than crossing the boundary as
//! errors.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::assembler;
use crate::blocks::VisualPackage;
use crate::comparison::resolve_series_axis;
use crate::compiler::QueryCompiler;
use crate::completeness::ensure_complete;
use crate::config::CuboConfig;
use crate::error::{CuboError, Result};
use crate::executor::QueryExecutor;
use crate::format::{DefaultFormatter, RowFormatter};
use crate::models::{CubeQuery, Intent, RequestMeta, VisualHint};
use crate::registry::SemanticCatalog;
use crate::shaper::{self, ShapeContext};

pub struct QueryService {
    catalog: Arc<SemanticCatalog>,
    executor: Arc<dyn QueryExecutor>,
    formatter: Arc<dyn RowFormatter>,
    config: CuboConfig,
}

impl QueryService {
    pub fn new(catalog: Arc<SemanticCatalog>, executor: Arc<dyn QueryExecutor>) -> Self {
        QueryService {
            catalog,
            executor,
            formatter: Arc::new(DefaultFormatter),
            config: CuboConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CuboConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn RowFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Run one analytical request end to end. Never fails: validation and
    /// execution errors become a degraded envelope with an empty block list.
    pub async fn run_query(
        &self,
        intent: Intent,
        hint: VisualHint,
        query: CubeQuery,
        meta: RequestMeta,
    ) -> VisualPackage {
        match self.try_run(intent, hint, query, &meta).await {
            Ok(package) => package,
            Err(err) => {
                warn!(error = %err, title = %meta.title, "query degraded to failure envelope");
                VisualPackage::degraded(format!(
                    "No se pudo completar la consulta \"{}\": {err}",
                    meta.title
                ))
            }
        }
    }

    async fn try_run(
        &self,
        intent: Intent,
        hint: VisualHint,
        mut query: CubeQuery,
        meta: &RequestMeta,
    ) -> Result<VisualPackage> {
        validate_request(hint, &query)?;

        let compiler = QueryCompiler;
        let sql = compiler.compile(&self.catalog, intent, &query, &self.config)?;
        debug!(%sql, "compiled statement");

        let result = self.executor.execute(&sql).await?.with_window_total();
        // Zero-fill against the caller's original primary axis, then promote
        // the compared dimension to the series position for shaping.
        let result = ensure_complete(result, &query, &self.catalog)?;
        resolve_series_axis(&mut query, intent, &self.catalog);

        let ctx = ShapeContext {
            catalog: &self.catalog,
            query: &query,
            formatter: self.formatter.as_ref(),
        };
        let blocks = shaper::shape(&result, hint, &ctx)?;

        Ok(assembler::assemble(
            blocks,
            &meta.title,
            &query,
            &self.catalog,
            result.rows.len(),
            result.total_rows,
        ))
    }
}

/// Reject invalid hint/query combinations before compilation.
fn validate_request(hint: VisualHint, query: &CubeQuery) -> Result<()> {
    match hint {
        VisualHint::KpiRow if query.metrics.is_empty() => Err(CuboError::MalformedRequest(
            "kpi row requires at least one metric".to_string(),
        )),
        VisualHint::PieChart if query.metrics.is_empty() => Err(CuboError::MalformedRequest(
            "pie requires at least one metric".to_string(),
        )),
        VisualHint::LineChart | VisualHint::BarChart if query.metrics.is_empty() => {
            Err(CuboError::MalformedRequest(
                "chart requires at least one metric".to_string(),
            ))
        }
        VisualHint::LineChart | VisualHint::BarChart if query.dimensions.is_empty() => {
            Err(CuboError::MalformedRequest(
                "chart requires at least one dimension".to_string(),
            ))
        }
        _ => Ok(()),
    }
}
