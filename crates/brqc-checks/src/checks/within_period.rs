//! Broadcast date inside the contracted monitoring period.

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::column_value;
use brqc_model::{CheckStatus, parse_date};

use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const NAME: &str = "Within_Period";

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let resolver = resolver_for(df);
    let Some(date_col) = resolver.resolve(ctx.config.bsr_candidates("date")) else {
        return Ok(CheckOutcome::uniform(
            df.height(),
            CheckStatus::NotApplicable,
            "Date column not found",
        ));
    };

    let mut outcome = CheckOutcome::with_capacity(df.height());
    for idx in 0..df.height() {
        let raw = column_value(df, date_col, idx);
        match parse_date(&raw) {
            Some(date) if ctx.period.contains(date) => outcome.push(CheckStatus::Pass, ""),
            Some(_) => outcome.push(CheckStatus::Fail, "Date outside monitoring period"),
            None => outcome.push(CheckStatus::Fail, "Invalid or missing date"),
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
    fn classifies_inside_outside_and_invalid_dates() {
        let config = QcConfig::default();
        let frame = df! {
            "Date" => ["2024-08-01", "2024-08-31", "2024-09-01", "not a date"],
        }
        .unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::Pass);
        assert_eq!(outcome.status[1], CheckStatus::Pass);
        assert_eq!(outcome.status[2], CheckStatus::Fail);
        assert_eq!(outcome.remark[2], "Date outside monitoring period");
        assert_eq!(outcome.status[3], CheckStatus::Fail);
        assert_eq!(outcome.remark[3], "Invalid or missing date");
    }

    #[test]
    fn missing_date_column_is_not_applicable() {
        let config = QcConfig::default();
        let frame = df! { "Market" => ["Spain"] }.unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::NotApplicable);
        assert_eq!(outcome.remark[0], "Date column not found");
    }
}
