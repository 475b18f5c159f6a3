use super::fonts::wrap_text;
use super::{ReportKind, ReportRow};

pub const FONT_SIZE: f32 = 10.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const TABLE_LEFT: f32 = 35.0;
pub const CELL_PADDING: f32 = 5.0;

/// Distance from the top edge to the column headers on the first page.
const TABLE_TOP_OFFSET: f32 = 240.0;
/// Distance from the top edge to the first row on continuation pages.
const CONTINUATION_TOP_OFFSET: f32 = 50.0;
/// Rows may not extend below this line (footer).
const BOTTOM_LIMIT: f32 = 70.0;
/// The last row leaves room for the signature block as well.
const LAST_ROW_BOTTOM_LIMIT: f32 = 127.0;

/// A table row pinned to a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub page: usize,
    /// Top edge of the row box.
    pub top: f32,
    pub height: f32,
    /// Wrapped lines per column.
    pub cells: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub header_top: f32,
    pub rows: Vec<PlacedRow>,
    pub page_count: usize,
}

/// Wrap every cell and assign rows to pages.
///
/// Column headers are drawn only on the first page. A row that would cross
/// the bottom limit opens a new page; the row is never split.
pub fn layout_table(kind: ReportKind, rows: &[ReportRow]) -> TableLayout {
    let (_, height) = kind.page_size();
    let header_top = height - TABLE_TOP_OFFSET;
    let mut y = header_top - ROW_HEIGHT;
    let mut page = 0;
    let mut placed = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<Vec<String>> = kind
            .columns()
            .iter()
            .map(|column| wrap_text(row.field(column.field), column.width - 2.0 * CELL_PADDING, FONT_SIZE))
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let row_height = lines as f32 * ROW_HEIGHT;

        let is_last = index + 1 == rows.len();
        let limit = if is_last { LAST_ROW_BOTTOM_LIMIT } else { BOTTOM_LIMIT };
        if y - row_height < limit {
            page += 1;
            y = height - CONTINUATION_TOP_OFFSET;
        }

        placed.push(PlacedRow {
            page,
            top: y,
            height: row_height,
            cells,
        });
        y -= row_height;
    }

    TableLayout {
        header_top,
        rows: placed,
        page_count: page + 1,
    }
}
