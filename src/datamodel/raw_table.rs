use super::RawCell;

/// Header row plus data rows of an uploaded file, before any typing.
///
/// Rows may be ragged: a row can hold fewer or more cells than there
/// are headers. Use [`cell_at`] to read a column safely.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
    pub total_rows: usize,
}

static NULL_CELL: RawCell = RawCell::Null;

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let total_rows = rows.len();
        Self {
            headers,
            rows,
            total_rows,
        }
    }
}

/// Cell at `position` in a possibly short row, `Null` when missing.
pub fn cell_at(row: &[RawCell], position: usize) -> &RawCell {
    row.get(position).unwrap_or(&NULL_CELL)
}
