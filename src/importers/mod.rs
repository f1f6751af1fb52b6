pub mod csv;
pub mod error;
pub mod file_format;
pub mod xlsx;

pub use error::ParseError;
pub use file_format::FileFormat;

use crate::datamodel::{RawCell, RawTable};

/// Parses an uploaded file into headers and data rows.
///
/// The format is picked from the file name. Nothing is kept between calls.
pub async fn parse_file(file_name: &str, bytes: &[u8]) -> Result<RawTable, ParseError> {
    let format = FileFormat::from_file_name(file_name)?;
    let grid = match format {
        FileFormat::Csv => csv::read_csv(bytes).await?,
        FileFormat::Xlsx | FileFormat::Xls => xlsx::read_workbook_async(bytes.to_vec()).await?,
    };
    let table = build_raw_table(grid)?;
    tracing::debug!(
        file_name,
        %format,
        headers = table.headers.len(),
        rows = table.total_rows,
        "Parsed file"
    );
    Ok(table)
}

fn is_blank_row(row: &[RawCell]) -> bool {
    row.iter().all(RawCell::is_blank)
}

/// Turns a cell grid into a table: blank rows go, the first remaining row
/// becomes the header row.
///
/// Headers are trimmed. A header left empty is removed along with its
/// cells in every row, so positions keep matching headers.
pub fn build_raw_table(grid: Vec<Vec<RawCell>>) -> Result<RawTable, ParseError> {
    let mut rows = grid.into_iter().filter(|row| !is_blank_row(row));
    let header_row = rows.next().ok_or(ParseError::EmptyFile)?;

    let kept_positions: Vec<usize> = header_row
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_blank())
        .map(|(position, _)| position)
        .collect();
    if kept_positions.is_empty() {
        return Err(ParseError::EmptySource);
    }
    let headers: Vec<String> = kept_positions
        .iter()
        .map(|position| header_row[*position].as_text().trim().to_string())
        .collect();

    // Cells beyond the header row are kept, ragged rows pass through
    let data_rows: Vec<Vec<RawCell>> = if kept_positions.len() == header_row.len() {
        rows.collect()
    } else {
        rows.map(|row| without_positions(row, &header_row, &kept_positions))
            .filter(|row| !is_blank_row(row))
            .collect()
    };

    Ok(RawTable::new(headers, data_rows))
}

/// Drops the cells sitting under blank headers.
fn without_positions(
    row: Vec<RawCell>,
    header_row: &[RawCell],
    kept_positions: &[usize],
) -> Vec<RawCell> {
    row.into_iter()
        .enumerate()
        .filter(|(position, _)| *position >= header_row.len() || kept_positions.contains(position))
        .map(|(_, cell)| cell)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<RawCell> {
        values.iter().map(|value| RawCell::from(*value)).collect()
    }

    #[test]
    fn test_build_raw_table() {
        let grid = vec![
            row(&["", "  "]),
            row(&[" Produto ", "Quantidade"]),
            row(&["Alface", "150"]),
            row(&[" ", ""]),
            vec![RawCell::Null, RawCell::Null],
            row(&["Tomate"]),
            row(&["Cenoura", "80", "extra"]),
        ];
        let table = build_raw_table(grid).unwrap();
        assert_eq!(table.headers, vec!["Produto", "Quantidade"]);
        assert_eq!(table.total_rows, 3);
        assert_eq!(table.rows[1], row(&["Tomate"]));
        assert_eq!(table.rows[2].len(), 3);
    }

    #[test]
    fn test_blank_header_removes_its_column() {
        let grid = vec![
            row(&["A", "", "C"]),
            row(&["1", "2", "3"]),
            row(&["", "only here", ""]),
            row(&["4", "5", "6", "7"]),
        ];
        let table = build_raw_table(grid).unwrap();
        assert_eq!(table.headers, vec!["A", "C"]);
        assert_eq!(table.rows[0], row(&["1", "3"]));
        // The row only had a value under the blank header
        assert_eq!(table.total_rows, 2);
        assert_eq!(table.rows[1], row(&["4", "6", "7"]));
    }

    #[test]
    fn test_numeric_header() {
        let grid = vec![
            vec![RawCell::Number(2024.0), RawCell::from("Safra")],
            vec![RawCell::Number(1.0), RawCell::from("Soja")],
        ];
        let table = build_raw_table(grid).unwrap();
        assert_eq!(table.headers, vec!["2024", "Safra"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(build_raw_table(vec![]), Err(ParseError::EmptyFile));
        assert_eq!(
            build_raw_table(vec![row(&["", " "]), vec![RawCell::Null]]),
            Err(ParseError::EmptyFile)
        );
    }

    #[test]
    fn test_headers_only() {
        let table = build_raw_table(vec![row(&["A", "B"])]).unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.total_rows, 0);
    }

    #[tokio::test]
    async fn test_parse_file() {
        let table = parse_file("colheita.CSV", b"Produto,Quantidade\n\nAlface,150\n,\n")
            .await
            .unwrap();
        assert_eq!(table.headers, vec!["Produto", "Quantidade"]);
        assert_eq!(table.rows, vec![row(&["Alface", "150"])]);
    }

    #[tokio::test]
    async fn test_parse_file_errors() {
        assert!(matches!(
            parse_file("notas.txt", b"a,b").await,
            Err(ParseError::UnsupportedFormat { .. })
        ));
        assert_eq!(parse_file("vazio.csv", b"").await, Err(ParseError::EmptyFile));
        assert_eq!(
            parse_file("vazio.csv", b" , ,\n,,\n").await,
            Err(ParseError::EmptyFile)
        );
        assert!(matches!(
            parse_file("quebrado.xlsx", b"not a zip").await,
            Err(ParseError::ParseFailure { .. })
        ));
    }
}
