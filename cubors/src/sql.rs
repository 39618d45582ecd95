//! SQL literal rendering.
//!
//! Identifier safety lives in the catalog: caller-supplied names are only
//! ever resolved to vetted expressions. Everything user-controlled that
//! reaches the statement text goes through these literal helpers.

use serde_json::Value;

pub fn escape_str(s: &str) -> String {
    s.replace('\'', "''")
}

pub fn quote_str(s: &str) -> String {
    format!("'{}'", escape_str(s))
}

/// Render a JSON scalar as a SQL literal.
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_str(s),
        // Compound values never reach the renderer as a single literal;
        // degrade to their JSON text rather than emit raw fragments.
        other => quote_str(&other.to_string()),
    }
}

/// Render a string literal uppercased, for case-insensitive comparison
/// against an `UPPER(...)`-wrapped column.
pub fn render_upper_literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote_str(&s.to_uppercase()),
        other => render_literal(other),
    }
}
