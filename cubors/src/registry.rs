use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;
use serde::Deserialize;
use tracing::info;

use crate::error::{CuboError, Result};
use crate::models::{DimensionDefinition, Intent, IntentDefault, MetricDefinition};

/// The catalog of everything that is askable: metrics, dimensions, mandatory
/// business filters and per-intent defaults.
///
/// Built once at startup and read-only afterwards; share via `Arc`.
#[derive(Debug, Default, Clone)]
pub struct SemanticCatalog {
    pub fact_table: String,
    metrics: BTreeMap<String, MetricDefinition>,
    dimensions: BTreeMap<String, DimensionDefinition>,
    aliases: HashMap<String, String>,
    mandatory_filters: Vec<String>,
    intent_defaults: Vec<IntentDefault>,
}

/// Root catalog file: fact table plus cross-cutting filter rules.
#[derive(Debug, Deserialize)]
struct CatalogRoot {
    fact_table: String,
    #[serde(default)]
    mandatory_filters: Vec<String>,
    #[serde(default)]
    intent_defaults: Vec<IntentDefault>,
}

impl SemanticCatalog {
    pub fn from_parts(
        fact_table: impl Into<String>,
        metrics: Vec<MetricDefinition>,
        dimensions: Vec<DimensionDefinition>,
        mandatory_filters: Vec<String>,
        intent_defaults: Vec<IntentDefault>,
    ) -> Self {
        let mut catalog = SemanticCatalog {
            fact_table: fact_table.into(),
            mandatory_filters,
            intent_defaults,
            ..Default::default()
        };
        for metric in metrics {
            catalog.metrics.insert(metric.key.clone(), metric);
        }
        for dimension in dimensions {
            for alias in &dimension.aliases {
                catalog
                    .aliases
                    .insert(alias.clone(), dimension.key.clone());
            }
            catalog
                .dimensions
                .insert(dimension.key.clone(), dimension);
        }
        catalog
    }

    /// Load a catalog directory: `catalog.yml` at the root plus one
    /// definition per file under `metrics/` and `dimensions/`.
    pub fn load_from_dir<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let root_file = root.join("catalog.yml");
        let contents = fs::read_to_string(&root_file).map_err(|e| {
            CuboError::MalformedRequest(format!(
                "catalog root {} not readable: {e}",
                root_file.display()
            ))
        })?;
        let catalog_root: CatalogRoot = serde_yaml::from_str(&contents)?;

        let mut metrics = Vec::new();
        for path in yaml_files(&root.join("metrics"))? {
            let contents = fs::read_to_string(&path)?;
            metrics.push(serde_yaml::from_str::<MetricDefinition>(&contents)?);
        }
        let mut dimensions = Vec::new();
        for path in yaml_files(&root.join("dimensions"))? {
            let contents = fs::read_to_string(&path)?;
            dimensions.push(serde_yaml::from_str::<DimensionDefinition>(&contents)?);
        }

        info!(
            metrics = metrics.len(),
            dimensions = dimensions.len(),
            fact_table = %catalog_root.fact_table,
            "loaded semantic catalog"
        );

        Ok(SemanticCatalog::from_parts(
            catalog_root.fact_table,
            metrics,
            dimensions,
            catalog_root.mandatory_filters,
            catalog_root.intent_defaults,
        ))
    }

    /// Resolve an alias to its canonical dimension key. Unknown names pass
    /// through unchanged; lookup decides whether they exist.
    pub fn canonical<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn metric(&self, key: &str) -> Result<&MetricDefinition> {
        self.metrics
            .get(key)
            .ok_or_else(|| CuboError::UnknownMetric(key.to_string()))
    }

    pub fn dimension(&self, key: &str) -> Result<&DimensionDefinition> {
        let canonical = self.canonical(key);
        self.dimensions
            .get(canonical)
            .ok_or_else(|| CuboError::UnknownDimension(key.to_string()))
    }

    /// Raw filter fragments appended to every compiled statement.
    pub fn mandatory_filters(&self) -> &[String] {
        &self.mandatory_filters
    }

    pub fn defaults_for(&self, intent: Intent) -> impl Iterator<Item = &IntentDefault> {
        self.intent_defaults
            .iter()
            .filter(move |d| d.intent == intent)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.values()
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &DimensionDefinition> {
        self.dimensions.values()
    }
}

fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for pattern in ["yml", "yaml"] {
        for entry in glob(&format!("{}/*.{pattern}", dir.display()))
            .map_err(|e| CuboError::Other(e.into()))?
            .flatten()
        {
            files.push(entry);
        }
    }
    files.sort();
    Ok(files)
}
