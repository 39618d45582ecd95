pub mod assembler;
pub mod blocks;
pub mod comparison;
pub mod compiler;
pub mod completeness;
pub mod config;
pub mod error;
pub mod executor;
pub mod format;
pub mod models;
pub mod registry;
pub mod runtime;
pub mod shaper;
pub mod sql;

use std::path::Path;

use crate::error::Result;

/// Load the semantic catalog from a configuration directory.
pub fn load_catalog<P: AsRef<Path>>(catalog_dir: P) -> Result<SemanticCatalog> {
    SemanticCatalog::load_from_dir(catalog_dir)
}

pub use blocks::{ChartKind, ChartSeries, KpiItem, VisualBlock, VisualPackage};
pub use config::CuboConfig;
pub use error::CuboError;
pub use executor::{ColumnMeta, QueryExecutor, QueryResult};
pub use format::{DefaultFormatter, RowFormatter};
pub use models::{
    CubeQuery, DimensionDefinition, FilterCondition, FilterOp, Intent, MetricDefinition,
    NumericFormat, RequestMeta, UnitKind, VisualHint,
};
pub use registry::SemanticCatalog;
pub use runtime::QueryService;
