//! Integration tests for the query compiler: identifier safety, mandatory
//! filters, business defaults and ordering rules.

use cubo::compiler::QueryCompiler;
use cubo::{CubeQuery, CuboConfig, CuboError, FilterCondition, FilterOp, Intent};
use serde_json::json;

mod fixtures {
    use std::collections::BTreeMap;

    use cubo::models::{
        DimensionCategory, DimensionDefinition, IntentDefault, MetricDefinition, NumericFormat,
        SortHint,
    };
    use cubo::registry::SemanticCatalog;
    use cubo::Intent;
    use serde_json::json;

    pub fn metric(key: &str, expr: &str, label: &str, format: NumericFormat) -> MetricDefinition {
        MetricDefinition {
            key: key.to_string(),
            expression: expr.to_string(),
            label: label.to_string(),
            description: None,
            format,
        }
    }

    pub fn dimension(
        key: &str,
        expr: &str,
        category: DimensionCategory,
        label: &str,
        sort: SortHint,
    ) -> DimensionDefinition {
        DimensionDefinition {
            key: key.to_string(),
            expression: expr.to_string(),
            category,
            label: label.to_string(),
            value_labels: BTreeMap::new(),
            sort,
            aliases: Vec::new(),
            sensitive: false,
            description: None,
        }
    }

    pub fn hr_catalog() -> SemanticCatalog {
        let mut anio = dimension(
            "anio",
            "EXTRACT(YEAR FROM fecha_foto)",
            DimensionCategory::Temporal,
            "Año",
            SortHint::Numeric,
        );
        anio.aliases = vec!["year".to_string(), "año".to_string()];
        let mes = dimension(
            "mes",
            "EXTRACT(MONTH FROM fecha_foto)",
            DimensionCategory::Temporal,
            "Mes",
            SortHint::Numeric,
        );
        let uo2 = dimension(
            "uo2",
            "uo2",
            DimensionCategory::Organizational,
            "División",
            SortHint::Default,
        );
        let mut estado = dimension(
            "estado",
            "estado",
            DimensionCategory::Segmentation,
            "Estado",
            SortHint::Default,
        );
        estado.aliases = vec!["status".to_string()];

        SemanticCatalog::from_parts(
            "rrhh.dotacion_mensual",
            vec![
                metric(
                    "ceses_totales",
                    "COUNT(DISTINCT CASE WHEN estado = 'Cesado' THEN id_empleado END)",
                    "Ceses totales",
                    NumericFormat::count(),
                ),
                metric(
                    "tasa_rotacion",
                    "ROUND(COUNT(DISTINCT CASE WHEN estado = 'Cesado' THEN id_empleado END) \
                     / NULLIF((SELECT AVG(t2.dotacion) FROM {table} t2), 0) * 100, 1)",
                    "Tasa de rotación",
                    NumericFormat::percentage(1),
                ),
            ],
            vec![anio, mes, uo2, estado],
            vec!["UPPER(categoria) <> 'PRACTICANTE'".to_string()],
            vec![IntentDefault {
                intent: Intent::Listing,
                dimension: "estado".to_string(),
                value: json!("Cesado"),
                unless_filtered: vec!["estado".to_string()],
            }],
        )
    }
}

fn compile(intent: Intent, query: &CubeQuery) -> cubo::error::Result<String> {
    QueryCompiler.compile(
        &fixtures::hr_catalog(),
        intent,
        query,
        &CuboConfig::default(),
    )
}

#[test]
fn unknown_metric_fails_before_any_sql() {
    let query = CubeQuery {
        metrics: vec!["tasa_ausentismo".to_string()],
        dimensions: vec!["uo2".to_string()],
        ..Default::default()
    };
    let err = compile(Intent::Snapshot, &query).unwrap_err();
    assert!(matches!(err, CuboError::UnknownMetric(key) if key == "tasa_ausentismo"));
}

#[test]
fn unknown_dimension_fails_before_any_sql() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["gerencia_x".to_string()],
        ..Default::default()
    };
    let err = compile(Intent::Snapshot, &query).unwrap_err();
    assert!(matches!(err, CuboError::UnknownDimension(key) if key == "gerencia_x"));
}

#[test]
fn unknown_filter_dimension_fails() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::eq("sede", "Lima")],
        ..Default::default()
    };
    assert!(compile(Intent::Snapshot, &query).is_err());
}

#[test]
fn mandatory_filter_present_without_caller_filters() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("UPPER(categoria) <> 'PRACTICANTE'"));
}

#[test]
fn mandatory_filter_present_with_caller_filters() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::eq("anio", 2025)],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("UPPER(categoria) <> 'PRACTICANTE'"));
}

#[test]
fn turnover_by_division_groups_and_filters_year() {
    let query = CubeQuery {
        metrics: vec!["tasa_rotacion".to_string()],
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::eq("anio", 2025)],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("GROUP BY 1"));
    assert!(sql.contains("UPPER(categoria) <> 'PRACTICANTE'"));
    assert!(sql.contains("EXTRACT(YEAR FROM fecha_foto) = 2025"));
    // The table placeholder must be fully substituted.
    assert!(!sql.contains("{table}"));
    assert!(sql.contains("FROM rrhh.dotacion_mensual t2"));
}

#[test]
fn string_list_filter_is_case_insensitive() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::in_list(
            "uo2",
            vec![json!("Ventas"), json!("Operaciones")],
        )],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("UPPER(uo2) IN ('VENTAS', 'OPERACIONES')"));
}

#[test]
fn numeric_list_filter_is_plain_in() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["anio".to_string()],
        filters: vec![FilterCondition::in_list(
            "anio",
            vec![json!(2024), json!(2025)],
        )],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("EXTRACT(YEAR FROM fecha_foto) IN (2024, 2025)"));
}

#[test]
fn scalar_string_filter_is_case_insensitive() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::eq("estado", "cesado")],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("UPPER(estado) = 'CESADO'"));
}

#[test]
fn string_literals_are_escaped() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::eq("uo2", "O'Higgins")],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("'O''HIGGINS'"));
}

#[test]
fn latest_period_sentinel_compiles_to_max_subquery() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::eq("mes", "MAX")],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains(
        "EXTRACT(MONTH FROM fecha_foto) = \
         (SELECT MAX(EXTRACT(MONTH FROM fecha_foto)) FROM rrhh.dotacion_mensual)"
    ));
}

#[test]
fn listing_does_not_aggregate_and_carries_window_total() {
    let query = CubeQuery {
        dimensions: vec!["uo2".to_string(), "estado".to_string()],
        ..Default::default()
    };
    let sql = compile(Intent::Listing, &query).unwrap();
    assert!(!sql.contains("GROUP BY"));
    assert!(sql.contains("COUNT(*) OVER () AS total_rows"));
}

#[test]
fn temporal_first_dimension_orders_ascending() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["anio".to_string()],
        ..Default::default()
    };
    let sql = compile(Intent::Trend, &query).unwrap();
    assert!(sql.contains("ORDER BY 1 ASC"));
}

#[test]
fn categorical_first_dimension_orders_by_metric_descending() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.contains("ORDER BY 2 DESC"));
}

#[test]
fn default_limit_applied_and_capped() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(sql.ends_with("LIMIT 100"));

    let capped = CubeQuery {
        limit: Some(5_000),
        ..query
    };
    let sql = compile(Intent::Snapshot, &capped).unwrap();
    assert!(sql.ends_with("LIMIT 1000"));
}

#[test]
fn listing_intent_injects_default_estado() {
    let query = CubeQuery {
        dimensions: vec!["uo2".to_string()],
        ..Default::default()
    };
    let sql = compile(Intent::Listing, &query).unwrap();
    assert!(sql.contains("UPPER(estado) = 'CESADO'"));
}

#[test]
fn explicit_estado_filter_suppresses_default() {
    let query = CubeQuery {
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition::eq("estado", "Activo")],
        ..Default::default()
    };
    let sql = compile(Intent::Listing, &query).unwrap();
    assert!(sql.contains("UPPER(estado) = 'ACTIVO'"));
    assert!(!sql.contains("'CESADO'"));
}

#[test]
fn alias_filter_suppresses_default_too() {
    let query = CubeQuery {
        dimensions: vec!["uo2".to_string()],
        filters: vec![FilterCondition {
            dimension: "status".to_string(),
            op: FilterOp::Eq,
            value: json!("Activo"),
        }],
        ..Default::default()
    };
    let sql = compile(Intent::Listing, &query).unwrap();
    assert!(!sql.contains("'CESADO'"));
}

#[test]
fn default_not_injected_for_other_intents() {
    let query = CubeQuery {
        metrics: vec!["ceses_totales".to_string()],
        dimensions: vec!["uo2".to_string()],
        ..Default::default()
    };
    let sql = compile(Intent::Snapshot, &query).unwrap();
    assert!(!sql.contains("'CESADO'"));
}

#[test]
fn empty_request_is_malformed() {
    let err = compile(Intent::Snapshot, &CubeQuery::default()).unwrap_err();
    assert!(matches!(err, CuboError::MalformedRequest(_)));
}
