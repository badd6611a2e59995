//! Contracted domestic coverage: every matchday of the domestic league must
//! have at least one live or delayed broadcast in the domestic market.
//!
//! The verdict is per matchday, written onto every in-scope row of that
//! matchday. Highlights and magazine rows in the domestic market are marked
//! not applicable even when their matchday lacks coverage.

use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::column_value;
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const NAME: &str = "Domestic_Market_Coverage";

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let rows = df.height();
    let cfg = ctx.config;
    let resolver = resolver_for(df);
    let market_col = resolver.resolve(cfg.bsr_candidates("market"));
    let matchday_col = resolver.resolve(cfg.bsr_candidates("match_day"));
    let type_col = resolver.resolve(cfg.bsr_candidates("type_of_program"));
    let league_col = resolver
        .resolve(cfg.bsr_candidates("competition"))
        .or_else(|| resolver.resolve(cfg.bsr_candidates("event")));
    let (Some(market_col), Some(matchday_col), Some(type_col), Some(league_col)) =
        (market_col, matchday_col, type_col, league_col)
    else {
        return Ok(CheckOutcome::uniform(
            rows,
            CheckStatus::NotApplicable,
            "Required column missing",
        ));
    };

    let domestic_market = cfg.project_rules.domestic_market.to_lowercase();
    let league_keywords: Vec<String> = cfg
        .project_rules
        .domestic_league_keywords
        .iter()
        .map(|kw| kw.to_lowercase())
        .collect();

    let mut in_domestic_market = vec![false; rows];
    let mut in_scope = vec![false; rows];
    let mut types = Vec::with_capacity(rows);
    let mut matchdays = Vec::with_capacity(rows);
    for idx in 0..rows {
        let market = column_value(df, market_col, idx).to_lowercase();
        let league = column_value(df, league_col, idx).to_lowercase();
        in_domestic_market[idx] = market.contains(&domestic_market);
        in_scope[idx] =
            in_domestic_market[idx] && league_keywords.iter().any(|kw| league.contains(kw));
        types.push(column_value(df, type_col, idx).to_lowercase());
        matchdays.push(column_value(df, matchday_col, idx).trim().to_string());
    }

    // Coverage verdict per matchday, over in-scope rows only.
    let mut covered: BTreeMap<String, bool> = BTreeMap::new();
    for idx in 0..rows {
        if !in_scope[idx] {
            continue;
        }
        let has_coverage = types[idx].contains("live") || types[idx].contains("delayed");
        let entry = covered.entry(matchdays[idx].to_lowercase()).or_insert(false);
        *entry = *entry || has_coverage;
    }

    let mut outcome = CheckOutcome::with_capacity(rows);
    for idx in 0..rows {
        if in_domestic_market[idx]
            && (types[idx].contains("highlight") || types[idx].contains("magazine"))
        {
            outcome.push(
                CheckStatus::NotApplicable,
                "Not applicable for highlights or magazine programs",
            );
        } else if in_scope[idx] {
            if covered
                .get(&matchdays[idx].to_lowercase())
                .copied()
                .unwrap_or(false)
            {
                outcome.push(
                    CheckStatus::Pass,
                    format!("Live/delayed coverage present for matchday {}", matchdays[idx]),
                );
            } else {
                outcome.push(
                    CheckStatus::Fail,
                    format!("No live/delayed coverage for matchday {}", matchdays[idx]),
                );
            }
        } else {
            outcome.push(
                CheckStatus::NotApplicable,
                "Other market or competition, not applicable",
            );
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
    fn matchday_without_live_or_delayed_fails_all_its_rows() {
        let config = QcConfig::default();
        let frame = df! {
            "Market" => ["Spain", "Spain", "Spain", "Italy"],
            "Matchday" => ["5", "5", "6", "6"],
            "Type of Program" => ["Live", "Support", "Support", "Live"],
            "Competition" => ["LaLiga", "LaLiga", "LaLiga", "LaLiga"],
        }
        .unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::Pass);
        assert_eq!(outcome.status[1], CheckStatus::Pass);
        assert_eq!(outcome.status[2], CheckStatus::Fail);
        assert_eq!(outcome.remark[2], "No live/delayed coverage for matchday 6");
        // Non-domestic market is out of scope.
        assert_eq!(outcome.status[3], CheckStatus::NotApplicable);
    }

    #[test]
    fn highlights_rows_are_exempt_even_without_coverage() {
        let config = QcConfig::default();
        let frame = df! {
            "Market" => ["Spain"],
            "Matchday" => ["7"],
            "Type of Program" => ["Highlights"],
            "Competition" => ["LaLiga"],
        }
        .unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::NotApplicable);
        assert_eq!(
            outcome.remark[0],
            "Not applicable for highlights or magazine programs"
        );
    }

    #[test]
    fn missing_columns_mark_all_rows_not_applicable() {
        let config = QcConfig::default();
        let frame = df! { "Market" => ["Spain"] }.unwrap();
        let outcome = run(&frame, &ctx(&config)).unwrap();
        assert_eq!(outcome.status[0], CheckStatus::NotApplicable);
        assert_eq!(outcome.remark[0], "Required column missing");
    }
}
