// Table I/O - CSV/TSV in, CSV/TSV/JSON out

pub mod csv;
pub mod json;

pub use crate::csv::{read_table, read_table_with_delimiter, write_csv};
pub use crate::json::write_json;
