use super::{
    dates::{matches_date_pattern, parse_date},
    parsing::{is_boolean_like, is_number_like},
};
use crate::datamodel::{ColumnType, RawCell};

/// Share of non-empty values a type test must strictly exceed to win.
pub const TYPE_MATCH_THRESHOLD: f64 = 0.8;

pub(crate) fn exceeds_threshold(matching: usize, total: usize, threshold: f64) -> bool {
    total > 0 && (matching as f64 / total as f64) > threshold
}

pub fn is_date_like(cell: &RawCell) -> bool {
    match cell {
        RawCell::Text(text) => matches_date_pattern(text) || parse_date(text).is_some(),
        _ => false,
    }
}

/// Infers the type of a column from its cells.
///
/// Blank cells are ignored. Tests run in the order boolean, number, date,
/// and the first one matching more than 80% of the non-empty cells wins.
/// A column without any non-empty cell is text.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a RawCell>,
{
    let non_empty: Vec<&RawCell> = cells.into_iter().filter(|cell| !cell.is_blank()).collect();
    if non_empty.is_empty() {
        return ColumnType::Text;
    }

    let wins = |test: fn(&RawCell) -> bool| {
        let matching = non_empty.iter().filter(|cell| test(cell)).count();
        exceeds_threshold(matching, non_empty.len(), TYPE_MATCH_THRESHOLD)
    };

    if wins(is_boolean_like) {
        ColumnType::Boolean
    } else if wins(is_number_like) {
        ColumnType::Number
    } else if wins(is_date_like) {
        ColumnType::Date
    } else {
        ColumnType::Text
    }
}
