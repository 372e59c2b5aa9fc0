pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::{count_by_author, count_by_file, count_modules_by_author, sorted_rows};
pub use exec::exec;
pub use output::{format_table, output_json, output_ndjson, output_table, RangeMeta};
