mod summary;
mod workbook;

pub use summary::{CheckSummary, OK_SUFFIX, summarize};
pub use workbook::{report_path, write_report};
