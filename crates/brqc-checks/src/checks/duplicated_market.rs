//! Cross-market duplication against the macro rules.
//!
//! Each macro rule promises that everything aired on an origin market/channel
//! is mirrored on a duplicate market/channel. The check collects the event
//! set per (market, channel) pair for rows belonging to the configured league
//! and verifies the origin set is a subset of the duplicate set. Both sides
//! of every rule get the rule's verdict; rows no rule touches stay
//! not-applicable.
//!
//! The set of channel names involved in any rule is returned alongside the
//! row outcomes: the overlap check exempts those channels from same-slot
//! duplicate flagging, because a simulcast is the contract being honored.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::column_value;
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const NAME: &str = "Duplicated_Markets";

/// Lowercased channel names appearing on either side of a macro rule.
#[derive(Debug, Clone, Default)]
pub struct DuplicatedChannels(pub BTreeSet<String>);

impl DuplicatedChannels {
    pub fn contains(&self, channel: &str) -> bool {
        self.0.contains(&channel.trim().to_lowercase())
    }
}

fn pair_key(market: &str, channel: &str) -> (String, String) {
    (market.trim().to_lowercase(), channel.trim().to_lowercase())
}

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<(CheckOutcome, DuplicatedChannels)> {
    let rows = df.height();
    let Some(rules) = ctx.macro_rules else {
        let outcome = CheckOutcome::uniform(rows, CheckStatus::NotApplicable, "Macro file missing");
        return Ok((outcome, DuplicatedChannels::default()));
    };

    let mut channels = DuplicatedChannels::default();
    for rule in rules {
        for channel in [&rule.origin_channel, &rule.dup_channel] {
            let name = channel.trim().to_lowercase();
            if !name.is_empty() {
                channels.0.insert(name);
            }
        }
    }

    let keyword = ctx.config.project_rules.league_keyword.to_lowercase();
    let league_rules: Vec<_> = rules
        .iter()
        .filter(|rule| rule.project.to_lowercase().contains(&keyword))
        .collect();
    if league_rules.is_empty() {
        let outcome = CheckOutcome::uniform(
            rows,
            CheckStatus::NotApplicable,
            &format!(
                "No matching league ({}) found in macro",
                ctx.config.project_rules.league_keyword
            ),
        );
        return Ok((outcome, channels));
    }

    let cfg = ctx.config;
    let resolver = resolver_for(df);
    let col = |role: &str| resolver.resolve(cfg.bsr_candidates(role)).map(str::to_string);
    let market_col = col("market");
    let channel_col = col("tv_channel");
    let event_col = col("event");
    let competition_col = col("competition");
    let home_col = col("home_team");
    let away_col = col("away_team");
    let date_col = col("date");

    let cell = |column: &Option<String>, idx: usize| {
        column
            .as_deref()
            .map(|name| column_value(df, name, idx))
            .unwrap_or_default()
    };

    // Event identity: the event text when present, otherwise the
    // home/away/date composite.
    let event_key = |idx: usize| {
        let event = cell(&event_col, idx);
        let trimmed = event.trim();
        if trimmed.is_empty() {
            format!(
                "{} vs {} {}",
                cell(&home_col, idx).trim(),
                cell(&away_col, idx).trim(),
                cell(&date_col, idx).trim()
            )
            .to_lowercase()
        } else {
            trimmed.to_lowercase()
        }
    };

    let mut in_league = vec![false; rows];
    let mut row_pair: Vec<Option<(String, String)>> = vec![None; rows];
    let mut events_by_pair: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
    for idx in 0..rows {
        let scope_text = format!(
            "{} {}",
            cell(&competition_col, idx),
            cell(&event_col, idx)
        )
        .to_lowercase();
        in_league[idx] = scope_text.contains(&keyword);
        if !in_league[idx] {
            continue;
        }
        let market = cell(&market_col, idx);
        let channel = cell(&channel_col, idx);
        if market.trim().is_empty() || channel.trim().is_empty() {
            continue;
        }
        let pair = pair_key(&market, &channel);
        events_by_pair
            .entry(pair.clone())
            .or_default()
            .insert(event_key(idx));
        row_pair[idx] = Some(pair);
    }

    let empty = BTreeSet::new();
    let mut status: Vec<Option<CheckStatus>> = vec![None; rows];
    let mut remark: Vec<String> = vec![String::new(); rows];
    for rule in &league_rules {
        let origin = pair_key(&rule.origin_market, &rule.origin_channel);
        let dup = pair_key(&rule.dup_market, &rule.dup_channel);
        let origin_events = events_by_pair.get(&origin).unwrap_or(&empty);
        let dup_events = events_by_pair.get(&dup).unwrap_or(&empty);
        let missing = origin_events.difference(dup_events).count();
        let (rule_status, rule_remark) = if missing == 0 {
            (
                CheckStatus::Pass,
                "All origin events present on duplicate market".to_string(),
            )
        } else {
            (
                CheckStatus::Fail,
                format!(
                    "Missing {missing} events on duplicate {}/{}",
                    rule.dup_market, rule.dup_channel
                ),
            )
        };

        for idx in 0..rows {
            let Some(pair) = &row_pair[idx] else { continue };
            if *pair != origin && *pair != dup {
                continue;
            }
            match status[idx] {
                None => {
                    status[idx] = Some(rule_status);
                    remark[idx] = rule_remark.clone();
                }
                Some(existing) => {
                    if rule_status.is_fail() && !existing.is_fail() {
                        status[idx] = Some(rule_status);
                    }
                    if remark[idx] != rule_remark {
                        remark[idx] = format!("{}; {}", remark[idx], rule_remark);
                    }
                }
            }
        }
    }

    let mut outcome = CheckOutcome::with_capacity(rows);
    for idx in 0..rows {
        match status[idx] {
            Some(verdict) => outcome.push(verdict, remark[idx].clone()),
            None if in_league[idx] => {
                outcome.push(CheckStatus::NotApplicable, "No duplication rule applies");
            }
            None => outcome.push(CheckStatus::NotApplicable, "Different competition/event"),
        }
    }
    Ok((outcome, channels))
}
