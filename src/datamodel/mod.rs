pub mod batch;
pub mod column_type;
pub mod folder;
pub mod raw_cell;
pub mod raw_table;
pub mod record;
pub mod schema;

pub use batch::RecordBatch;
pub use column_type::ColumnType;
pub use folder::{Folder, FolderStatus, NewFolder};
pub use raw_cell::RawCell;
pub use raw_table::RawTable;
pub use record::{TypedRecord, TypedValue};
pub use schema::{ColumnSchema, DetectedSchema, SampleRow};
