//! Check driver: runs every check in a fixed order and annotates the table.
//!
//! Checks are independent except for one explicit hand-off: the duplicated
//! markets check produces the set of simulcast channels that the overlap
//! module consumes. A check that errors internally still annotates its
//! columns (all rows `Error`) and never aborts the run; annotation itself
//! failing is a programming error and propagates.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::{debug, warn};

use crate::checks::{
    completeness, domestic_coverage, duplicated_market, event_fixture, id_consistency,
    market_channel, overlap, program_category, rates_ratings, source, within_period,
};
use crate::context::RunContext;
use crate::outcome::{CheckOutcome, annotate};

/// Column families in report order. The summary and the workbook writer walk
/// this list instead of guessing from column names.
pub const CHECK_ORDER: &[&str] = &[
    completeness::NAME,
    within_period::NAME,
    program_category::NAME,
    event_fixture::NAME,
    market_channel::CONSISTENCY,
    market_channel::DESCRIPTION,
    domestic_coverage::NAME,
    rates_ratings::NAME,
    duplicated_market::NAME,
    overlap::OVERLAP,
    overlap::DUPLICATE,
    overlap::DAYBREAK,
    id_consistency::NAME,
    source::NAME,
];

/// What the driver did, for logging and the console summary.
#[derive(Debug, Default)]
pub struct EngineReport {
    /// Column families annotated, in order.
    pub annotated: Vec<String>,
    /// Internal check failures, already reflected as `Error` rows.
    pub errors: Vec<String>,
}

fn apply(
    df: &mut DataFrame,
    name: &str,
    result: Result<CheckOutcome>,
    report: &mut EngineReport,
) -> Result<()> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(check = name, error = %err, "check failed internally");
            report.errors.push(format!("{name}: {err:#}"));
            CheckOutcome::error(df.height(), &format!("{err:#}"))
        }
    };
    annotate(df, name, &outcome)?;
    let failed = outcome.status.iter().filter(|s| s.is_fail()).count();
    debug!(check = name, rows = outcome.len(), failed, "check annotated");
    report.annotated.push(name.to_string());
    Ok(())
}

fn apply_multi(
    df: &mut DataFrame,
    names: &[&str],
    result: Result<Vec<(String, CheckOutcome)>>,
    report: &mut EngineReport,
) -> Result<()> {
    match result {
        Ok(outcomes) => {
            for (name, outcome) in outcomes {
                apply(df, &name, Ok(outcome), report)?;
            }
        }
        Err(err) => {
            warn!(checks = ?names, error = %err, "check group failed internally");
            for name in names {
                report.errors.push(format!("{name}: {err:#}"));
                annotate(df, name, &CheckOutcome::error(df.height(), &format!("{err:#}")))?;
                report.annotated.push((*name).to_string());
            }
        }
    }
    Ok(())
}

/// Run all checks against the table, appending `_OK`/`_Remark` column pairs.
///
/// Business columns are never modified; re-running on an already annotated
/// table overwrites the previous annotations in place.
pub fn run_checks(df: &mut DataFrame, ctx: &RunContext) -> Result<EngineReport> {
    let mut report = EngineReport::default();

    let result = completeness::run(df, ctx);
    apply(df, completeness::NAME, result, &mut report)?;
    let result = within_period::run(df, ctx);
    apply(df, within_period::NAME, result, &mut report)?;
    let result = program_category::run(df, ctx);
    apply(df, program_category::NAME, result, &mut report)?;
    let result = event_fixture::run(df, ctx);
    apply(df, event_fixture::NAME, result, &mut report)?;
    let result = market_channel::run(df, ctx);
    apply_multi(
        df,
        &[market_channel::CONSISTENCY, market_channel::DESCRIPTION],
        result,
        &mut report,
    )?;
    let result = domestic_coverage::run(df, ctx);
    apply(df, domestic_coverage::NAME, result, &mut report)?;
    let result = rates_ratings::run(df, ctx);
    apply(df, rates_ratings::NAME, result, &mut report)?;

    let dup_channels = match duplicated_market::run(df, ctx) {
        Ok((outcome, channels)) => {
            apply(df, duplicated_market::NAME, Ok(outcome), &mut report)?;
            channels
        }
        Err(err) => {
            apply(df, duplicated_market::NAME, Err(err), &mut report)?;
            duplicated_market::DuplicatedChannels::default()
        }
    };
    let result = overlap::run(df, ctx, &dup_channels);
    apply_multi(
        df,
        &[overlap::OVERLAP, overlap::DUPLICATE, overlap::DAYBREAK],
        result,
        &mut report,
    )?;

    let result = id_consistency::run(df, ctx);
    apply(df, id_consistency::NAME, result, &mut report)?;
    let result = source::run(df, ctx);
    apply(df, source::NAME, result, &mut report)?;

    debug!(
        checks = report.annotated.len(),
        errors = report.errors.len(),
        rows = df.height(),
        "qc run complete"
    );
    Ok(report)
}
