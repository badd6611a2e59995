//! Exactly one audience figure per row: metered or estimated, never both.

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::{column_value, is_present_text};
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const NAME: &str = "Rates_Ratings";

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let resolver = resolver_for(df);
    let estimates_col = resolver.resolve(ctx.config.bsr_candidates("aud_estimates"));
    let metered_col = resolver.resolve(ctx.config.bsr_candidates("aud_metered"));
    if estimates_col.is_none() && metered_col.is_none() {
        return Ok(CheckOutcome::uniform(
            df.height(),
            CheckStatus::NotApplicable,
            "Audience columns not found",
        ));
    }

    let present = |column: Option<&str>, idx: usize| {
        column.is_some_and(|name| is_present_text(&column_value(df, name, idx)))
    };

    let mut outcome = CheckOutcome::with_capacity(df.height());
    for idx in 0..df.height() {
        let estimates = present(estimates_col, idx);
        let metered = present(metered_col, idx);
        match (estimates, metered) {
            (false, false) => {
                outcome.push(CheckStatus::Fail, "Missing audience ratings (both empty)");
            }
            (true, true) => {
                outcome.push(
                    CheckStatus::Fail,
                    "Invalid: both metered and estimated present",
                );
            }
            _ => outcome.push(CheckStatus::Pass, "Valid: one rating source available"),
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brqc_model::{MonitoringPeriod, QcConfig};
    use chrono::NaiveDate;
    use polars::prelude::df;

    fn ctx(config: &QcConfig) -> RunContext<'_> {
        RunContext {
            config,
            period: MonitoringPeriod::new(
                NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
            ),
            fixture: None,
            roster: None,
            macro_rules: None,
        }
    }

    #[test]
    fn exactly_one_source_passes() {
        let config = QcConfig::default();
        let frame = df! {
            "Audience Estimates" => ["120", "", "120", ""],
            "Audience Metered" => ["", "88", "88", ""],
        }
        .unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::Pass);
        assert_eq!(outcome.status[1], CheckStatus::Pass);
        assert_eq!(outcome.status[2], CheckStatus::Fail);
        assert_eq!(outcome.remark[2], "Invalid: both metered and estimated present");
        assert_eq!(outcome.status[3], CheckStatus::Fail);
        assert_eq!(outcome.remark[3], "Missing audience ratings (both empty)");
    }

    #[test]
    fn zero_counts_as_present() {
        let config = QcConfig::default();
        let frame = df! {
            "Audience Estimates" => ["0"],
            "Audience Metered" => [""],
        }
        .unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::Pass);
    }

    #[test]
    fn without_audience_columns_rows_are_not_applicable() {
        let config = QcConfig::default();
        let frame = df! { "Market" => ["Spain"] }.unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::NotApplicable);
    }
}
