use super::ParseError;
use crate::datamodel::RawCell;
use futures::StreamExt;
use std::io::Cursor;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
/// Candidate delimiters, in tie-breaking order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Picks the delimiter that occurs most often on the first non-blank line,
/// ignoring what sits between double quotes.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let Some(first_line) = bytes
        .split(|byte| *byte == b'\n')
        .find(|line| line.iter().any(|byte| !byte.is_ascii_whitespace()))
    else {
        return b',';
    };

    let mut counts = [0usize; DELIMITERS.len()];
    let mut in_quotes = false;
    for byte in first_line {
        if *byte == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(index) = DELIMITERS.iter().position(|d| d == byte) {
                counts[index] += 1;
            }
        }
    }

    let mut best = 0;
    for index in 1..DELIMITERS.len() {
        if counts[index] > counts[best] {
            best = index;
        }
    }
    DELIMITERS[best]
}

/// Reads every record of a CSV file as text cells.
///
/// Record lengths may differ. Invalid UTF-8 is replaced rather than
/// rejected, legacy exports are often Latin-1.
pub async fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<RawCell>>, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let delimiter = sniff_delimiter(bytes);

    let mut csv_reader = csv_async::AsyncReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .create_reader(Cursor::new(bytes));

    let mut rows = Vec::new();
    let mut records = csv_reader.byte_records();
    while let Some(record) = records.next().await {
        let record = record.map_err(|err| ParseError::failure("csv", err))?;
        let row = record
            .iter()
            .map(|field| RawCell::Text(String::from_utf8_lossy(field).into_owned()))
            .collect::<Vec<_>>();
        rows.push(row);
    }

    Ok(rows)
}
