//! Event / home / away / matchday agreement with the fixture list.
//!
//! Full-match rows must name an exact fixture: the four-field tuple is
//! compared case-insensitively against the fixture list. Missing fields fail
//! on their own, distinct from a complete tuple that no fixture carries.

use std::collections::BTreeSet;

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::{column_value, is_present_text};
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const NAME: &str = "Event_Matchday";

type FixtureKey = (String, String, String, String);

fn key(event: &str, home: &str, away: &str, matchday: &str) -> FixtureKey {
    (
        event.trim().to_lowercase(),
        home.trim().to_lowercase(),
        away.trim().to_lowercase(),
        matchday.trim().to_lowercase(),
    )
}

fn fixture_keys(fixture: &DataFrame, ctx: &RunContext) -> Option<BTreeSet<FixtureKey>> {
    let cfg = ctx.config;
    let resolver = resolver_for(fixture);
    let event_col = resolver.resolve(cfg.fixture_candidates("event"))?;
    let home_col = resolver.resolve(cfg.fixture_candidates("home_team"))?;
    let away_col = resolver.resolve(cfg.fixture_candidates("away_team"))?;
    let matchday_col = resolver.resolve(cfg.fixture_candidates("match_day"))?;

    let mut keys = BTreeSet::new();
    for idx in 0..fixture.height() {
        keys.insert(key(
            &column_value(fixture, event_col, idx),
            &column_value(fixture, home_col, idx),
            &column_value(fixture, away_col, idx),
            &column_value(fixture, matchday_col, idx),
        ));
    }
    Some(keys)
}

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let rows = df.height();
    let cfg = ctx.config;
    let rules = &cfg.qc_rules.program_category;
    let resolver = resolver_for(df);
    let col = |role: &str| resolver.resolve(cfg.bsr_candidates(role)).map(str::to_string);
    let type_col = col("type_of_program");
    let event_col = col("event").or_else(|| col("competition"));
    let home_col = col("home_team");
    let away_col = col("away_team");
    let matchday_col = col("match_day");

    let fixtures = match ctx.fixture {
        Some(fixture) => match fixture_keys(fixture, ctx) {
            Some(keys) => Some(keys),
            None => {
                return Ok(CheckOutcome::uniform(
                    rows,
                    CheckStatus::NotApplicable,
                    "Fixture list missing required columns",
                ));
            }
        },
        None => None,
    };

    let cell = |column: &Option<String>, idx: usize| {
        column
            .as_deref()
            .map(|name| column_value(df, name, idx))
            .unwrap_or_default()
    };

    let mut outcome = CheckOutcome::with_capacity(rows);
    for idx in 0..rows {
        let declared = cell(&type_col, idx).trim().to_lowercase();
        if !rules.live_types.iter().any(|t| *t == declared) {
            outcome.push(CheckStatus::NotApplicable, "Not a full match program");
            continue;
        }
        let Some(keys) = &fixtures else {
            outcome.push(CheckStatus::NotApplicable, "Fixture list sheet missing");
            continue;
        };
        let event = cell(&event_col, idx);
        let home = cell(&home_col, idx);
        let away = cell(&away_col, idx);
        let matchday = cell(&matchday_col, idx);
        if [&event, &home, &away, &matchday]
            .iter()
            .any(|value| !is_present_text(value))
        {
            outcome.push(CheckStatus::Fail, "Missing event/home/away/matchday");
        } else if keys.contains(&key(&event, &home, &away, &matchday)) {
            outcome.push(CheckStatus::Pass, "OK");
        } else {
            outcome.push(CheckStatus::Fail, "No matching fixture found");
        }
    }
    Ok(outcome)
}
