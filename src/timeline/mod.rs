pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::{build_document, contributor_totals, monthly_stats, MonthStats, MonthlyStats, DEFAULT_MIN_COMMITS, PALETTE};
pub use exec::{exec, ContributorOptions};
pub use output::{format_summary, output_document, print_summary, write_document};
