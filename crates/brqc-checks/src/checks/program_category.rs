//! Declared program type versus the category inferred from the fixture list.
//!
//! Full-match rows are matched to fixtures by team pairing and calendar day,
//! then ordered by start time: the earliest airing of a fixture is live when
//! it starts within the kick-off tolerance and fills the expected slot,
//! otherwise delayed; every later airing is a repeat. Support programming is
//! validated on duration alone. The inferred category is written alongside
//! the verdict so a reviewer can see what the comparison was.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::DataFrame;

use brqc_ingest::column_value;
use brqc_model::{
    CheckStatus, ColumnResolver, combine_date_time, duration_field_minutes, end_timestamp,
    parse_date,
};

use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const NAME: &str = "Program_Category";
pub const EXPECTED_COLUMN: &str = "Program_Category_Expected";

struct RowFacts {
    declared: String,
    home: String,
    away: String,
    date: Option<NaiveDate>,
    start: Option<NaiveDateTime>,
    duration_min: Option<i64>,
}

fn collect_facts(df: &DataFrame, resolver: &ColumnResolver, ctx: &RunContext) -> Vec<RowFacts> {
    let col = |role: &str| {
        resolver
            .resolve(ctx.config.bsr_candidates(role))
            .map(str::to_string)
    };
    let type_col = col("type_of_program");
    let home_col = col("home_team");
    let away_col = col("away_team");
    let date_col = col("date");
    let start_col = col("start_time");
    let end_col = col("end_time");
    let duration_col = col("duration");

    let cell = |column: &Option<String>, idx: usize| {
        column
            .as_deref()
            .map(|name| column_value(df, name, idx))
            .unwrap_or_default()
    };

    (0..df.height())
        .map(|idx| {
            let date_raw = cell(&date_col, idx);
            let start = combine_date_time(&date_raw, &cell(&start_col, idx));
            let duration_min = start
                .and_then(|s| {
                    end_timestamp(s, &date_raw, &cell(&end_col, idx))
                        .map(|end| (end - s).num_minutes())
                })
                .or_else(|| duration_field_minutes(&cell(&duration_col, idx)));
            RowFacts {
                declared: cell(&type_col, idx).trim().to_lowercase(),
                home: cell(&home_col, idx).trim().to_lowercase(),
                away: cell(&away_col, idx).trim().to_lowercase(),
                date: parse_date(&date_raw),
                start,
                duration_min,
            }
        })
        .collect()
}

/// Assign an expected category to every full-match row that a fixture
/// accounts for. First fixture claiming a row wins.
fn classify_against_fixtures(
    fixture: &DataFrame,
    facts: &[RowFacts],
    ctx: &RunContext,
) -> Option<Vec<Option<String>>> {
    let cfg = ctx.config;
    let rules = &cfg.qc_rules.program_category;
    let resolver = resolver_for(fixture);
    let home_col = resolver.resolve(cfg.fixture_candidates("home_team"))?;
    let away_col = resolver.resolve(cfg.fixture_candidates("away_team"))?;
    let date_col = resolver.resolve(cfg.fixture_candidates("date"))?;
    let start_col = resolver.resolve(cfg.fixture_candidates("start_time"));

    let mut expected: Vec<Option<String>> = vec![None; facts.len()];
    for fix_idx in 0..fixture.height() {
        let home = column_value(fixture, home_col, fix_idx).trim().to_lowercase();
        let away = column_value(fixture, away_col, fix_idx).trim().to_lowercase();
        let date_raw = column_value(fixture, date_col, fix_idx);
        let Some(date) = parse_date(&date_raw) else {
            continue;
        };
        if home.is_empty() || away.is_empty() {
            continue;
        }
        let scheduled = start_col
            .and_then(|name| combine_date_time(&date_raw, &column_value(fixture, name, fix_idx)));

        let mut airings: Vec<usize> = facts
            .iter()
            .enumerate()
            .filter(|(idx, row)| {
                expected[*idx].is_none()
                    && rules.live_types.iter().any(|t| *t == row.declared)
                    && row.home == home
                    && row.away == away
                    && row.date == Some(date)
                    && row.start.is_some()
            })
            .map(|(idx, _)| idx)
            .collect();
        airings.sort_by_key(|idx| facts[*idx].start);

        for (order, idx) in airings.iter().enumerate() {
            let row = &facts[*idx];
            let category = if order > 0 {
                "repeat"
            } else {
                let on_time = match (scheduled, row.start) {
                    (Some(sched), Some(start)) => {
                        (start - sched).num_minutes().abs() <= rules.live_tolerance_min
                    }
                    _ => false,
                };
                let slot_filled = row.duration_min.is_some_and(|minutes| {
                    (minutes - rules.bsa_max_duration).abs() <= rules.live_tolerance_min
                });
                if on_time && slot_filled { "live" } else { "delayed" }
            };
            expected[*idx] = Some(category.to_string());
        }
    }
    Some(expected)
}

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let rows = df.height();
    let rules = &ctx.config.qc_rules.program_category;
    let resolver = resolver_for(df);
    let facts = collect_facts(df, &resolver, ctx);

    let Some(fixture) = ctx.fixture else {
        let mut outcome = CheckOutcome::uniform(rows, CheckStatus::Fail, "Fixture list sheet missing");
        outcome
            .extra
            .push((EXPECTED_COLUMN.to_string(), vec!["unknown".to_string(); rows]));
        return Ok(outcome);
    };
    let Some(expected) = classify_against_fixtures(fixture, &facts, ctx) else {
        let mut outcome = CheckOutcome::uniform(
            rows,
            CheckStatus::Fail,
            "Fixture list missing required columns",
        );
        outcome
            .extra
            .push((EXPECTED_COLUMN.to_string(), vec!["unknown".to_string(); rows]));
        return Ok(outcome);
    };

    let mut outcome = CheckOutcome::with_capacity(rows);
    let mut expected_out: Vec<String> = Vec::with_capacity(rows);
    for (idx, row) in facts.iter().enumerate() {
        if rules.relaxed_types.iter().any(|t| *t == row.declared) {
            match row.duration_min {
                Some(minutes)
                    if minutes >= rules.support_duration_min
                        && minutes <= rules.support_duration_max =>
                {
                    outcome.push(CheckStatus::Pass, "OK");
                }
                Some(minutes) => {
                    outcome.push(
                        CheckStatus::Fail,
                        format!("Support duration out of range ({minutes} min)"),
                    );
                }
                None => outcome.push(CheckStatus::Fail, "Invalid or missing duration"),
            }
            expected_out.push("support".to_string());
        } else if rules.live_types.iter().any(|t| *t == row.declared) {
            if row.start.is_none() {
                outcome.push(CheckStatus::Fail, "Invalid BSR start time");
                expected_out.push("unknown".to_string());
            } else {
                match &expected[idx] {
                    Some(category) if *category == row.declared => {
                        outcome.push(CheckStatus::Pass, "OK");
                        expected_out.push(category.clone());
                    }
                    Some(category) => {
                        outcome.push(
                            CheckStatus::Fail,
                            format!("Expected '{category}', found '{}'", row.declared),
                        );
                        expected_out.push(category.clone());
                    }
                    None => {
                        outcome.push(CheckStatus::Fail, "No matching fixture found");
                        expected_out.push("unknown".to_string());
                    }
                }
            }
        } else {
            outcome.push(CheckStatus::NotApplicable, "Type not subject to category check");
            expected_out.push("n/a".to_string());
        }
    }
    outcome.extra.push((EXPECTED_COLUMN.to_string(), expected_out));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brqc_model::{MonitoringPeriod, QcConfig};
    use polars::prelude::df;

    fn period() -> MonitoringPeriod {
        MonitoringPeriod::new(
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
        )
    }

    fn fixture() -> DataFrame {
        df! {
            "Home Team" => ["Alpha"],
            "Away Team" => ["Beta"],
            "Date" => ["2024-08-10"],
            "Start Time" => ["20:00:00"],
        }
        .unwrap()
    }

    fn bsr() -> DataFrame {
        df! {
            "Type of Program" => ["Live", "Repeat", "Live", "Highlights"],
            "Home Team" => ["Alpha", "Alpha", "Gamma", ""],
            "Away Team" => ["Beta", "Beta", "Delta", ""],
            "Date" => ["2024-08-10", "2024-08-10", "2024-08-10", "2024-08-10"],
            "Start (UTC)" => ["20:15:00", "23:30:00", "18:00:00", "10:00:00"],
            "End (UTC)" => ["23:20:00", "02:35:00", "21:05:00", "10:45:00"],
        }
        .unwrap()
    }

    #[test]
    fn earliest_airing_is_live_and_later_is_repeat() {
        let config = QcConfig::default();
        let fixture = fixture();
        let ctx = RunContext {
            config: &config,
            period: period(),
            fixture: Some(&fixture),
            roster: None,
            macro_rules: None,
        };
        let outcome = run(&bsr(), &ctx).unwrap();
        // 20:15 start, 15 min after kick-off, 185 min slot: live as declared.
        assert_eq!(outcome.status[0], CheckStatus::Pass);
        assert_eq!(outcome.status[1], CheckStatus::Pass);
        assert_eq!(outcome.extra[0].1[1], "repeat");
        // No fixture for Gamma vs Delta.
        assert_eq!(outcome.status[2], CheckStatus::Fail);
        assert_eq!(outcome.remark[2], "No matching fixture found");
        // 45 minutes of highlights sits inside the support band.
        assert_eq!(outcome.status[3], CheckStatus::Pass);
        assert_eq!(outcome.extra[0].1[3], "support");
    }

    #[test]
    fn declared_delayed_on_a_live_slot_fails_with_expectation() {
        let config = QcConfig::default();
        let fixture = fixture();
        let ctx = RunContext {
            config: &config,
            period: period(),
            fixture: Some(&fixture),
            roster: None,
            macro_rules: None,
        };
        let frame = df! {
            "Type of Program" => ["Delayed"],
            "Home Team" => ["Alpha"],
            "Away Team" => ["Beta"],
            "Date" => ["2024-08-10"],
            "Start (UTC)" => ["20:10:00"],
            "End (UTC)" => ["23:10:00"],
        }
        .unwrap();
        let outcome = run(&frame, &ctx).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::Fail);
        assert_eq!(outcome.remark[0], "Expected 'live', found 'delayed'");
    }

    #[test]
    fn missing_fixture_sheet_fails_every_row() {
        let config = QcConfig::default();
        let ctx = RunContext {
            config: &config,
            period: period(),
            fixture: None,
            roster: None,
            macro_rules: None,
        };
        let outcome = run(&bsr(), &ctx).unwrap();
        assert!(outcome.status.iter().all(|s| *s == CheckStatus::Fail));
        assert_eq!(outcome.remark[0], "Fixture list sheet missing");
    }
}
