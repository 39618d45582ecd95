//! Catalog lookup, alias resolution and YAML loading tests.

use std::collections::BTreeMap;
use std::fs;

use cubo::models::{
    DimensionCategory, DimensionDefinition, IntentDefault, MetricDefinition, NumericFormat,
    SortHint,
};
use cubo::registry::SemanticCatalog;
use cubo::{CuboError, Intent};
use serde_json::json;

fn sample_catalog() -> SemanticCatalog {
    let anio = DimensionDefinition {
        key: "anio".to_string(),
        expression: "EXTRACT(YEAR FROM fecha_foto)".to_string(),
        category: DimensionCategory::Temporal,
        label: "Año".to_string(),
        value_labels: BTreeMap::new(),
        sort: SortHint::Numeric,
        aliases: vec!["year".to_string(), "año".to_string()],
        sensitive: false,
        description: None,
    };
    let metric = MetricDefinition {
        key: "ceses_totales".to_string(),
        expression: "COUNT(DISTINCT id_empleado)".to_string(),
        label: "Ceses totales".to_string(),
        description: None,
        format: NumericFormat::count(),
    };
    SemanticCatalog::from_parts(
        "rrhh.dotacion_mensual",
        vec![metric],
        vec![anio],
        vec!["UPPER(categoria) <> 'PRACTICANTE'".to_string()],
        vec![
            IntentDefault {
                intent: Intent::Listing,
                dimension: "estado".to_string(),
                value: json!("Cesado"),
                unless_filtered: vec!["estado".to_string()],
            },
            IntentDefault {
                intent: Intent::Snapshot,
                dimension: "mes".to_string(),
                value: json!("MAX"),
                unless_filtered: vec!["mes".to_string(), "anio".to_string()],
            },
        ],
    )
}

#[test]
fn aliases_resolve_to_canonical_dimension() {
    let catalog = sample_catalog();
    assert_eq!(catalog.dimension("year").unwrap().key, "anio");
    assert_eq!(catalog.dimension("año").unwrap().key, "anio");
    assert_eq!(catalog.dimension("anio").unwrap().key, "anio");
}

#[test]
fn unknown_keys_fail_with_named_errors() {
    let catalog = sample_catalog();
    let err = catalog.metric("headcount").unwrap_err();
    assert!(matches!(err, CuboError::UnknownMetric(key) if key == "headcount"));
    let err = catalog.dimension("gerencia").unwrap_err();
    assert!(matches!(err, CuboError::UnknownDimension(key) if key == "gerencia"));
}

#[test]
fn defaults_are_filtered_by_intent() {
    let catalog = sample_catalog();
    let listing: Vec<_> = catalog.defaults_for(Intent::Listing).collect();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].dimension, "estado");
    assert!(catalog.defaults_for(Intent::Trend).next().is_none());
}

#[test]
fn definitions_enumerate_in_key_order() {
    let catalog = sample_catalog();
    let metric_keys: Vec<_> = catalog.metrics().map(|m| m.key.as_str()).collect();
    assert_eq!(metric_keys, ["ceses_totales"]);
    let dimension_keys: Vec<_> = catalog.dimensions().map(|d| d.key.as_str()).collect();
    assert_eq!(dimension_keys, ["anio"]);
}

#[test]
fn mandatory_filters_are_exposed_in_order() {
    let catalog = sample_catalog();
    assert_eq!(
        catalog.mandatory_filters(),
        ["UPPER(categoria) <> 'PRACTICANTE'"]
    );
}

#[test]
fn loads_catalog_from_yaml_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("metrics")).unwrap();
    fs::create_dir_all(root.join("dimensions")).unwrap();

    fs::write(
        root.join("catalog.yml"),
        r#"
fact_table: rrhh.dotacion_mensual
mandatory_filters:
  - "UPPER(categoria) <> 'PRACTICANTE'"
intent_defaults:
  - intent: listing
    dimension: estado
    value: Cesado
    unless_filtered: [estado]
"#,
    )
    .unwrap();

    fs::write(
        root.join("metrics/ceses_totales.yml"),
        r#"
key: ceses_totales
expression: "COUNT(DISTINCT CASE WHEN estado = 'Cesado' THEN id_empleado END)"
label: Ceses totales
format:
  unit: count
"#,
    )
    .unwrap();

    fs::write(
        root.join("dimensions/anio.yml"),
        r#"
key: anio
expression: "EXTRACT(YEAR FROM fecha_foto)"
category: temporal
label: "Año"
sort: numeric
aliases: [year]
"#,
    )
    .unwrap();

    fs::write(
        root.join("dimensions/estado.yaml"),
        r#"
key: estado
expression: estado
category: segmentation
label: Estado
"#,
    )
    .unwrap();

    let catalog = SemanticCatalog::load_from_dir(root).unwrap();
    assert_eq!(catalog.fact_table, "rrhh.dotacion_mensual");
    assert_eq!(catalog.metric("ceses_totales").unwrap().label, "Ceses totales");
    assert_eq!(catalog.dimension("year").unwrap().key, "anio");
    assert_eq!(
        catalog.dimension("estado").unwrap().category,
        DimensionCategory::Segmentation
    );
    assert_eq!(catalog.defaults_for(Intent::Listing).count(), 1);
}

#[test]
fn missing_catalog_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SemanticCatalog::load_from_dir(dir.path()).is_err());
}
