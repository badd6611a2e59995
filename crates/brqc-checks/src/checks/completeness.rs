//! Mandatory-field completeness.
//!
//! Every row must carry channel, channel ID, matchday, source and program
//! type, exactly one of the two audience figures, and a home/away pairing
//! when the declared type describes a full match. Missing columns are named
//! in the remark rather than silently passing.

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::{column_value, is_present_text};
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::{CheckOutcome, join_remarks};

pub const NAME: &str = "Completeness";

const MANDATORY_ROLES: [(&str, &str); 5] = [
    ("tv_channel", "TV Channel"),
    ("channel_id", "Channel ID"),
    ("match_day", "Match Day"),
    ("source", "Source"),
    ("type_of_program", "Type of Program"),
];

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let resolver = resolver_for(df);
    let cfg = ctx.config;
    let resolve = |role: &str| resolver.resolve(cfg.bsr_candidates(role)).map(str::to_string);

    let mandatory: Vec<(Option<String>, &str)> = MANDATORY_ROLES
        .iter()
        .map(|(role, display)| (resolve(role), *display))
        .collect();
    let estimates_col = resolve("aud_estimates");
    let metered_col = resolve("aud_metered");
    let type_col = resolve("type_of_program");
    let home_col = resolve("home_team");
    let away_col = resolve("away_team");

    let rules = &cfg.qc_rules.program_category;
    let is_full_match = |declared: &str| rules.live_types.iter().any(|t| t == declared);
    let is_relaxed = |declared: &str| rules.relaxed_types.iter().any(|t| t == declared);

    let mut outcome = CheckOutcome::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut missing: Vec<String> = Vec::new();

        for (column, display) in &mandatory {
            match column {
                Some(name) => {
                    if !is_present_text(&column_value(df, name, idx)) {
                        missing.push((*display).to_string());
                    }
                }
                None => missing.push(format!("{display} (column not found)")),
            }
        }

        if estimates_col.is_none() && metered_col.is_none() {
            missing.push("Audience (Estimates/Metered) (columns not found)".to_string());
        } else {
            let present = |column: &Option<String>| {
                column
                    .as_deref()
                    .is_some_and(|name| is_present_text(&column_value(df, name, idx)))
            };
            let estimates = present(&estimates_col);
            let metered = present(&metered_col);
            if !estimates && !metered {
                missing.push("Both Audience fields are empty".to_string());
            } else if estimates && metered {
                missing.push("Both Audience fields are present".to_string());
            }
        }

        let declared = type_col
            .as_deref()
            .map(|name| column_value(df, name, idx).trim().to_lowercase())
            .unwrap_or_default();
        if is_full_match(&declared) {
            for (column, display) in [(&home_col, "Home Team"), (&away_col, "Away Team")] {
                match column {
                    Some(name) => {
                        if !is_present_text(&column_value(df, name, idx)) {
                            missing.push(display.to_string());
                        }
                    }
                    None => missing.push(format!("{display} (column not found)")),
                }
            }
        } else if !is_relaxed(&declared) {
            // Unknown declared types only flag the teams when the columns
            // exist and are blank; absent columns are not an error here.
            for (column, display) in [(&home_col, "Home Team"), (&away_col, "Away Team")] {
                if let Some(name) = column
                    && !is_present_text(&column_value(df, name, idx))
                {
                    missing.push(display.to_string());
                }
            }
        }

        let remark = if missing.is_empty() {
            "All key fields present".to_string()
        } else {
            join_remarks(&missing)
        };
        outcome.push(CheckStatus::from_bool(missing.is_empty()), remark);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RunContext;
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

    fn frame() -> DataFrame {
        df! {
            "TV Channel" => ["ESPN", "", "ESPN"],
            "Channel ID" => ["123", "123", "123"],
            "Match Day" => ["5", "5", "5"],
            "Source" => ["Client", "Client", "Client"],
            "Type of Program" => ["Highlights", "Live", "Live"],
            "Home Team" => ["", "", "Alpha"],
            "Away Team" => ["", "", "Beta"],
            "Audience Estimates" => ["", "1000", "1000"],
            "Audience Metered" => ["", "", ""],
        }
        .unwrap()
    }

    #[test]
    fn flags_empty_audience_and_missing_channel() {
        let config = QcConfig::default();
        let outcome = run(&frame(), &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::Fail);
        assert!(outcome.remark[0].contains("Both Audience fields are empty"));
        assert_eq!(outcome.status[1], CheckStatus::Fail);
        assert!(outcome.remark[1].contains("TV Channel"));
        assert!(outcome.remark[1].contains("Home Team"));
    }

    #[test]
    fn passes_complete_full_match_row() {
        let config = QcConfig::default();
        let outcome = run(&frame(), &ctx(&config)).unwrap();
        assert_eq!(outcome.status[2], CheckStatus::Pass);
        assert_eq!(outcome.remark[2], "All key fields present");
    }

    #[test]
    fn names_missing_columns_in_remark() {
        let config = QcConfig::default();
        let frame = df! { "Market" => ["Spain"] }.unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::Fail);
        assert!(outcome.remark[0].contains("TV Channel (column not found)"));
        assert!(
            outcome.remark[0].contains("Audience (Estimates/Metered) (columns not found)")
        );
    }
}
