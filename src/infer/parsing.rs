use crate::datamodel::RawCell;
use nom::{
    IResult, Parser,
    character::complete::multispace0,
    combinator::{eof, verify},
    number::complete::double,
    sequence::{delimited, terminated},
};

/// Words read as `true`, compared after lowercasing.
pub const TRUE_WORDS: [&str; 4] = ["true", "sim", "yes", "1"];
/// Words read as `false`, compared after lowercasing.
pub const FALSE_WORDS: [&str; 4] = ["false", "não", "no", "0"];

/// Parses a whole string as a finite decimal number.
///
/// Surrounding whitespace is accepted, `inf` and `nan` are not.
pub fn parse_number(data: &str) -> IResult<&str, f64> {
    terminated(
        delimited(
            multispace0,
            verify(double, |value: &f64| value.is_finite()),
            multispace0,
        ),
        eof,
    )
    .parse(data)
}

pub fn parse_boolean_word(data: &str) -> Option<bool> {
    let lowercase = data.to_lowercase();
    if TRUE_WORDS.contains(&lowercase.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&lowercase.as_str()) {
        Some(false)
    } else {
        None
    }
}

pub fn is_boolean_like(cell: &RawCell) -> bool {
    match cell {
        RawCell::Bool(_) => true,
        other => parse_boolean_word(&other.as_text()).is_some(),
    }
}

/// Numeric value of a cell, when it has one.
///
/// Booleans count as 1 and 0, like spreadsheet formulas treat them.
pub fn number_value(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Null => None,
        RawCell::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
        RawCell::Number(value) => value.is_finite().then_some(*value),
        RawCell::Text(text) => parse_number(text).ok().map(|(_, value)| value),
    }
}

pub fn is_number_like(cell: &RawCell) -> bool {
    number_value(cell).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Ok(("", 42.0)));
        assert_eq!(parse_number("-42.5"), Ok(("", -42.5)));
        assert_eq!(parse_number(" 150 "), Ok(("", 150.0)));
        assert_eq!(parse_number("1.5e3"), Ok(("", 1500.0)));
        assert!(parse_number("abc").is_err());
        assert!(parse_number("12abc").is_err());
        assert!(parse_number("1,5").is_err());
        assert!(parse_number("").is_err());
        assert!(parse_number("inf").is_err());
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("Infinity").is_err());
    }

    #[test]
    fn test_parse_boolean_word() {
        assert_eq!(parse_boolean_word("Sim"), Some(true));
        assert_eq!(parse_boolean_word("YES"), Some(true));
        assert_eq!(parse_boolean_word("1"), Some(true));
        assert_eq!(parse_boolean_word("NÃO"), Some(false));
        assert_eq!(parse_boolean_word("False"), Some(false));
        assert_eq!(parse_boolean_word("0"), Some(false));
        assert_eq!(parse_boolean_word(" sim "), None);
        assert_eq!(parse_boolean_word("talvez"), None);
    }

    #[test]
    fn test_cells() {
        assert!(is_boolean_like(&RawCell::Bool(false)));
        assert!(is_boolean_like(&RawCell::Number(1.0)));
        assert!(!is_boolean_like(&RawCell::Number(2.0)));

        assert_eq!(number_value(&RawCell::Number(3.5)), Some(3.5));
        assert_eq!(number_value(&RawCell::from(" 7 ")), Some(7.0));
        assert_eq!(number_value(&RawCell::Bool(true)), Some(1.0));
        assert_eq!(number_value(&RawCell::Number(f64::INFINITY)), None);
        assert_eq!(number_value(&RawCell::Null), None);
        assert!(!is_number_like(&RawCell::from("abc")));
    }
}
