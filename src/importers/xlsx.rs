use super::ParseError;
use crate::{datamodel::RawCell, infer::dates::excel_serial_to_iso};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

fn data_to_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty | Data::Error(_) => RawCell::Null,
        Data::Int(value) => RawCell::Number(*value as f64),
        Data::Float(value) => RawCell::Number(*value),
        Data::String(value) => RawCell::Text(value.clone()),
        Data::Bool(value) => RawCell::Bool(*value),
        Data::DateTime(value) => excel_serial_to_iso(value.as_f64())
            .map(RawCell::Text)
            .unwrap_or(RawCell::Null),
        Data::DateTimeIso(value) | Data::DurationIso(value) => RawCell::Text(value.clone()),
    }
}

/// Reads the cell grid of the first sheet of an xlsx or xls workbook.
///
/// Other sheets are ignored. A workbook without any sheet gives no rows.
pub fn read_workbook(bytes: Vec<u8>) -> Result<Vec<Vec<RawCell>>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| ParseError::failure("spreadsheet", err))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|err| ParseError::failure("spreadsheet", err))?,
        None => return Ok(Vec::new()),
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect())
}

/// Same as [`read_workbook`], off the async runtime since decoding is CPU bound.
pub async fn read_workbook_async(bytes: Vec<u8>) -> Result<Vec<Vec<RawCell>>, ParseError> {
    tokio::task::spawn_blocking(move || read_workbook(bytes))
        .await
        .map_err(|err| ParseError::failure("spreadsheet", err))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Empty), RawCell::Null);
        assert_eq!(data_to_cell(&Data::Int(150)), RawCell::Number(150.0));
        assert_eq!(data_to_cell(&Data::Float(2.5)), RawCell::Number(2.5));
        assert_eq!(
            data_to_cell(&Data::String("Alface".to_string())),
            RawCell::from("Alface")
        );
        assert_eq!(data_to_cell(&Data::Bool(true)), RawCell::Bool(true));
        assert_eq!(
            data_to_cell(&Data::DateTimeIso("2025-01-15T10:00:00".to_string())),
            RawCell::from("2025-01-15T10:00:00")
        );
        assert_eq!(
            data_to_cell(&Data::Error(calamine::CellErrorType::Div0)),
            RawCell::Null
        );
    }

    #[test]
    fn test_invalid_workbook() {
        let result = read_workbook(b"definitely not a workbook".to_vec());
        assert!(matches!(result, Err(ParseError::ParseFailure { .. })));
    }
}
