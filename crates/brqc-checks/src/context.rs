//! Shared per-run inputs for the checks.

use polars::prelude::DataFrame;

use brqc_ingest::{MacroRule, RosterPairs};
use brqc_model::{ColumnResolver, MonitoringPeriod, QcConfig};

/// Everything a check may consult during one run. Built once by the driver;
/// checks hold no state of their own and no process-wide configuration
/// exists, so each check is independently testable with a handmade context.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    pub config: &'a QcConfig,
    pub period: MonitoringPeriod,
    /// Fixture list from the BSR workbook, when its sheet was found.
    pub fixture: Option<&'a DataFrame>,
    /// Valid (market, channel) pairs from the Rosco roster.
    pub roster: Option<&'a RosterPairs>,
    /// Cross-market duplication rules from the macro workbook.
    pub macro_rules: Option<&'a [MacroRule]>,
}

/// Column resolver over a frame's actual headers.
pub fn resolver_for(df: &DataFrame) -> ColumnResolver {
    ColumnResolver::new(df.get_column_names().iter().map(|name| name.as_str()))
}
