use crate::{
    datamodel::{ColumnType, RawCell, TypedValue},
    infer::{
        dates::{excel_serial_to_epoch, parse_date, to_iso_timestamp},
        parsing::{number_value, parse_boolean_word},
    },
};

/// Converts one raw cell to the declared column type.
///
/// Never fails: blank cells and cells that do not fit the type become `Null`.
pub fn coerce_value(cell: &RawCell, column_type: ColumnType) -> TypedValue {
    if cell.is_blank() {
        return TypedValue::Null;
    }
    match column_type {
        ColumnType::Number => number_value(cell)
            .map(TypedValue::Number)
            .unwrap_or(TypedValue::Null),
        ColumnType::Boolean => {
            let parsed = match cell {
                RawCell::Bool(value) => Some(*value),
                other => parse_boolean_word(&other.as_text()),
            };
            parsed.map(TypedValue::Boolean).unwrap_or(TypedValue::Null)
        }
        ColumnType::Date => {
            // Workbook numbers under a date column are serial dates
            let parsed = match cell {
                RawCell::Number(serial) => excel_serial_to_epoch(*serial),
                other => parse_date(&other.as_text()),
            };
            parsed
                .map(|epoch| TypedValue::Date(to_iso_timestamp(&epoch)))
                .unwrap_or(TypedValue::Null)
        }
        ColumnType::Text => TypedValue::Text(cell.as_text().into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_null_for_every_type() {
        for column_type in [
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Date,
            ColumnType::Boolean,
        ] {
            assert_eq!(coerce_value(&RawCell::Null, column_type), TypedValue::Null);
            assert_eq!(coerce_value(&RawCell::from("   "), column_type), TypedValue::Null);
        }
    }

    #[test]
    fn test_number() {
        assert_eq!(
            coerce_value(&RawCell::from("150"), ColumnType::Number),
            TypedValue::Number(150.0)
        );
        assert_eq!(
            coerce_value(&RawCell::Number(2.5), ColumnType::Number),
            TypedValue::Number(2.5)
        );
        assert_eq!(
            coerce_value(&RawCell::from("abc"), ColumnType::Number),
            TypedValue::Null
        );
        assert_eq!(
            coerce_value(&RawCell::from("1,5"), ColumnType::Number),
            TypedValue::Null
        );
    }

    #[test]
    fn test_boolean() {
        assert_eq!(
            coerce_value(&RawCell::from("Sim"), ColumnType::Boolean),
            TypedValue::Boolean(true)
        );
        assert_eq!(
            coerce_value(&RawCell::from("NÃO"), ColumnType::Boolean),
            TypedValue::Boolean(false)
        );
        assert_eq!(
            coerce_value(&RawCell::Number(0.0), ColumnType::Boolean),
            TypedValue::Boolean(false)
        );
        assert_eq!(
            coerce_value(&RawCell::Bool(true), ColumnType::Boolean),
            TypedValue::Boolean(true)
        );
        assert_eq!(
            coerce_value(&RawCell::from("talvez"), ColumnType::Boolean),
            TypedValue::Null
        );
    }

    #[test]
    fn test_date() {
        assert_eq!(
            coerce_value(&RawCell::from("15/01/2025"), ColumnType::Date),
            TypedValue::Date("2025-01-15T00:00:00.000Z".to_string())
        );
        assert_eq!(
            coerce_value(&RawCell::from("2025-02-30"), ColumnType::Date),
            TypedValue::Null
        );
        assert_eq!(
            coerce_value(&RawCell::from("2025-01-15 10:30:00"), ColumnType::Date),
            TypedValue::Date("2025-01-15T10:30:00.000Z".to_string())
        );
    }

    #[test]
    fn test_date_from_serial_number() {
        assert_eq!(
            coerce_value(&RawCell::Number(45672.0), ColumnType::Date),
            TypedValue::Date("2025-01-15T00:00:00.000Z".to_string())
        );
        assert_eq!(
            coerce_value(&RawCell::Number(45672.5), ColumnType::Date),
            TypedValue::Date("2025-01-15T12:00:00.000Z".to_string())
        );
        assert_eq!(
            coerce_value(&RawCell::Number(f64::INFINITY), ColumnType::Date),
            TypedValue::Null
        );
        // Serial numbers written as text are not dates
        assert_eq!(
            coerce_value(&RawCell::from("45672"), ColumnType::Date),
            TypedValue::Null
        );
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            coerce_value(&RawCell::from("  Alface "), ColumnType::Text),
            TypedValue::Text("  Alface ".to_string())
        );
        assert_eq!(
            coerce_value(&RawCell::Number(150.0), ColumnType::Text),
            TypedValue::Text("150".to_string())
        );
        assert_eq!(
            coerce_value(&RawCell::Bool(false), ColumnType::Text),
            TypedValue::Text("false".to_string())
        );
    }
}
