use crate::blocks::ChartSeries;

/// Separate differently scaled series: when any series is percentage or
/// ratio formatted, raw-count series would destroy the axis scale, so they
/// move to the tooltip-only list.
pub fn split(series: Vec<ChartSeries>) -> (Vec<ChartSeries>, Vec<ChartSeries>) {
    let any_ratio = series
        .iter()
        .any(|s| s.format.as_ref().is_some_and(|f| f.is_ratio_like()));
    if !any_ratio {
        return (series, Vec::new());
    }
    series
        .into_iter()
        .partition(|s| s.format.as_ref().is_some_and(|f| f.is_ratio_like()))
}
