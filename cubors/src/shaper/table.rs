use crate::blocks::VisualBlock;
use crate::compiler::TOTAL_ROWS_COLUMN;
use crate::executor::QueryResult;
use crate::shaper::ShapeContext;

/// One row per result row, headers in SELECT order. Rows pass through the
/// masking/formatting collaborator before leaving the core.
pub fn build(result: &QueryResult, ctx: &ShapeContext<'_>) -> VisualBlock {
    let headers: Vec<String> = result
        .columns
        .iter()
        .map(|c| c.name.clone())
        .filter(|name| name != TOTAL_ROWS_COLUMN)
        .collect();

    let rows = result
        .rows
        .iter()
        .map(|row| {
            let mut formatted = ctx.formatter.format_table_row(row, ctx.catalog);
            formatted.remove(TOTAL_ROWS_COLUMN);
            formatted
        })
        .collect();

    VisualBlock::Table { headers, rows }
}
