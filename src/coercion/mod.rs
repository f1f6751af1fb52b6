pub mod values;

pub use values::coerce_value;

use crate::datamodel::{ColumnSchema, RawCell, TypedRecord, TypedValue, raw_table::cell_at};
use std::collections::BTreeMap;

/// Converts raw rows into typed records following the final schema.
///
/// Each schema column reads the cell at its position. Records where every
/// value is null are dropped, and the survivors are numbered from 1.
pub fn coerce_rows(rows: &[Vec<RawCell>], schema: &[ColumnSchema]) -> Vec<TypedRecord> {
    rows.iter()
        .map(|row| TypedRecord {
            data: schema
                .iter()
                .map(|column| {
                    let cell = cell_at(row, column.position());
                    (column.name.clone(), coerce_value(cell, column.column_type))
                })
                .collect::<BTreeMap<String, TypedValue>>(),
            row_number: 0,
        })
        .filter(|record| !record.is_empty())
        .enumerate()
        .map(|(index, record)| TypedRecord {
            row_number: index + 1,
            ..record
        })
        .collect()
}
