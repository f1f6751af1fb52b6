pub mod columns;
pub mod dates;
pub mod parsing;
pub mod sanitize;
pub mod schema;

pub use columns::infer_column_type;
pub use dates::{parse_date, to_iso_timestamp};
pub use sanitize::sanitize_column_name;
pub use schema::{detect_schema, detect_table_schema};
