//! Report structures and output formatting

pub mod formatter;
pub mod report;

pub use formatter::{save_report_to_file, suggest_filename, OutputFormatter, ReportGenerator};
pub use report::{CompatibilityReport, RankingReport, ReportMetadata};
