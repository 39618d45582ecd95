//! Comparison axis normalization: downstream charting expects axis 0 to be
//! the categorical/temporal X-axis and axis 1 the series grouping.
//!
//! The caller (or the upstream translator) may list the compared dimension
//! anywhere; this moves it to the series position. Multi-metric requests are
//! left untouched: metric-as-series takes precedence.

use crate::models::{CubeQuery, Intent};
use crate::registry::SemanticCatalog;

pub fn resolve_series_axis(query: &mut CubeQuery, intent: Intent, catalog: &SemanticCatalog) {
    if intent != Intent::Comparison || query.dimensions.len() < 2 || query.metrics.len() != 1 {
        return;
    }

    // Scope filters on unrequested dimensions are not comparison axes; keep
    // scanning until a list filter matches a requested dimension.
    let position = query.filters.iter().find_map(|filter| {
        let values = filter.list_values()?;
        if values.len() < 2 {
            return None;
        }
        let key = catalog.canonical(&filter.dimension);
        query
            .dimensions
            .iter()
            .position(|d| catalog.canonical(d) == key)
    });
    let Some(position) = position else {
        return;
    };
    if position == 1 {
        return;
    }
    let dimension = query.dimensions.remove(position);
    query.dimensions.insert(1, dimension);
}
