mod table;

pub use table::{TableWriter, collect_headers, export_table, write_table};
