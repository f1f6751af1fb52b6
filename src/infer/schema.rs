use super::{
    columns::{exceeds_threshold, infer_column_type},
    sanitize::unique_column_names,
};
use crate::datamodel::{
    ColumnSchema, DetectedSchema, RawCell, RawTable, SampleRow, raw_table::cell_at,
};

/// Number of non-empty values kept as a column preview.
pub const SAMPLE_VALUES_PER_COLUMN: usize = 5;
/// Number of rows kept as a table preview.
pub const SAMPLE_ROWS: usize = 10;
/// Share of filled rows a column must strictly exceed to be required.
pub const REQUIRED_THRESHOLD: f64 = 0.8;

/// Detects the schema of a parsed table.
///
/// Each header becomes a column with a sanitized unique name, an inferred
/// type, a required flag and a few sample values. Detection never fails and
/// always gives the same result for the same input.
pub fn detect_schema(
    headers: &[String],
    rows: &[Vec<RawCell>],
    file_name: &str,
    file_size: u64,
) -> DetectedSchema {
    let names = unique_column_names(headers);

    let columns: Vec<ColumnSchema> = headers
        .iter()
        .zip(names.iter())
        .enumerate()
        .map(|(position, (header, name))| {
            let non_empty: Vec<&RawCell> = rows
                .iter()
                .map(|row| cell_at(row, position))
                .filter(|cell| !cell.is_blank())
                .collect();

            let column_type = infer_column_type(non_empty.iter().copied());
            let required = exceeds_threshold(non_empty.len(), rows.len(), REQUIRED_THRESHOLD);
            let sample_values = non_empty
                .iter()
                .take(SAMPLE_VALUES_PER_COLUMN)
                .map(|cell| (*cell).clone())
                .collect();

            tracing::debug!(
                column = %name,
                %column_type,
                required,
                "Detected column"
            );

            ColumnSchema::new(
                name.clone(),
                header.clone(),
                column_type,
                required,
                position,
                sample_values,
            )
        })
        .collect();

    let sample_data = rows
        .iter()
        .take(SAMPLE_ROWS)
        .map(|row| {
            names
                .iter()
                .enumerate()
                .map(|(position, name)| (name.clone(), cell_at(row, position).clone()))
                .collect::<SampleRow>()
        })
        .collect();

    DetectedSchema {
        columns,
        total_rows: rows.len(),
        sample_data,
        file_name: file_name.to_string(),
        file_size,
    }
}

pub fn detect_table_schema(table: &RawTable, file_name: &str, file_size: u64) -> DetectedSchema {
    detect_schema(&table.headers, &table.rows, file_name, file_size)
}
