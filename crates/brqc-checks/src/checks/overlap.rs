//! Schedule plausibility per channel: overlapping slots, duplicated rows,
//! and daybreak gaps between consecutive broadcasts.
//!
//! Rows are grouped by (market, channel) with the channel ID preferred over
//! the channel name, sorted by start timestamp. An event starting before the
//! previous one ends overlaps it; a start exactly at the previous end does
//! not. Internet-delivered rows are exempt from overlap and daybreak since
//! they are not bound to a linear schedule. Channels covered by a macro
//! duplication rule skip overlap detection and turn same-slot duplicates
//! across different markets into accepted simulcasts.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;
use polars::prelude::DataFrame;

use brqc_ingest::column_value;
use brqc_model::{CheckStatus, combine_date_time, end_timestamp};

use crate::checks::duplicated_market::DuplicatedChannels;
use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const OVERLAP: &str = "Overlap";
pub const DUPLICATE: &str = "Duplicate";
pub const DAYBREAK: &str = "Daybreak";

struct RowSlot {
    market: String,
    channel_name: String,
    /// Channel ID when present, channel name otherwise. Grouping key.
    channel_key: String,
    event: String,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    platform_exempt: bool,
}

fn collect_slots(df: &DataFrame, ctx: &RunContext) -> Vec<RowSlot> {
    let cfg = ctx.config;
    let resolver = resolver_for(df);
    let col = |role: &str| resolver.resolve(cfg.bsr_candidates(role)).map(str::to_string);
    let market_col = col("market");
    let channel_col = col("tv_channel");
    let channel_id_col = col("channel_id");
    let date_col = col("date");
    let start_col = col("start_time");
    let end_col = col("end_time");
    let pay_free_col = col("pay_free");
    let event_col = col("event");

    let ignore = &cfg.qc_rules.overlap_check.ignore_platforms;
    let cell = |column: &Option<String>, idx: usize| {
        column
            .as_deref()
            .map(|name| column_value(df, name, idx))
            .unwrap_or_default()
    };

    (0..df.height())
        .map(|idx| {
            let channel_name = cell(&channel_col, idx).trim().to_lowercase();
            let channel_id = cell(&channel_id_col, idx).trim().to_lowercase();
            let date_raw = cell(&date_col, idx);
            let start = combine_date_time(&date_raw, &cell(&start_col, idx));
            let end = start.and_then(|s| end_timestamp(s, &date_raw, &cell(&end_col, idx)));
            let platform = cell(&pay_free_col, idx).to_lowercase();
            RowSlot {
                market: cell(&market_col, idx).trim().to_lowercase(),
                channel_key: if channel_id.is_empty() {
                    channel_name.clone()
                } else {
                    channel_id
                },
                channel_name,
                event: cell(&event_col, idx).trim().to_lowercase(),
                start,
                end,
                platform_exempt: ignore.iter().any(|kw| platform.contains(kw)),
            }
        })
        .collect()
}

pub fn run(
    df: &DataFrame,
    ctx: &RunContext,
    dup_channels: &DuplicatedChannels,
) -> Result<Vec<(String, CheckOutcome)>> {
    let rows = df.height();
    let slots = collect_slots(df, ctx);
    let gap_tolerance = ctx.config.qc_rules.overlap_check.daybreak_gap_tolerance_min;

    let mut overlap = CheckOutcome::uniform(rows, CheckStatus::Pass, "");
    let mut duplicate = CheckOutcome::uniform(rows, CheckStatus::Pass, "");
    let mut daybreak = CheckOutcome::uniform(rows, CheckStatus::Pass, "");

    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (idx, slot) in slots.iter().enumerate() {
        if slot.start.is_none() || slot.end.is_none() {
            overlap.set(idx, CheckStatus::Fail, "Invalid start or end time");
            duplicate.set(idx, CheckStatus::NotApplicable, "Invalid start or end time");
            daybreak.set(idx, CheckStatus::NotApplicable, "Invalid start or end time");
            continue;
        }
        if slot.platform_exempt {
            overlap.set(
                idx,
                CheckStatus::NotApplicable,
                "Skipped (internet platform)",
            );
            daybreak.set(
                idx,
                CheckStatus::NotApplicable,
                "Skipped (internet platform)",
            );
            continue;
        }
        groups
            .entry((slot.market.clone(), slot.channel_key.clone()))
            .or_default()
            .push(idx);
    }

    for ((_, channel_key), indices) in &groups {
        let mut ordered = indices.clone();
        ordered.sort_by_key(|idx| (slots[*idx].start, *idx));

        let duplicated = ordered.iter().any(|idx| {
            dup_channels.contains(channel_key) || dup_channels.contains(&slots[*idx].channel_name)
        });
        if duplicated {
            for idx in &ordered {
                overlap.set(
                    *idx,
                    CheckStatus::NotApplicable,
                    "Skipped (channel duplicated across markets)",
                );
            }
        }

        for pair in ordered.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            let (Some(prev_end), Some(cur_start)) = (slots[prev].end, slots[cur].start) else {
                continue;
            };
            if !duplicated && cur_start < prev_end {
                overlap.set(
                    cur,
                    CheckStatus::Fail,
                    "Overlap detected between consecutive events",
                );
            }
            if (cur_start - prev_end).num_minutes() > gap_tolerance {
                daybreak.set(cur, CheckStatus::Fail, "Time gap too large for continuation");
            }
        }
    }

    // Duplicate rows: same channel, slot and event, market ignored so that
    // cross-market copies are caught too.
    let mut by_identity: BTreeMap<(String, NaiveDateTime, NaiveDateTime, String), Vec<usize>> =
        BTreeMap::new();
    for (idx, slot) in slots.iter().enumerate() {
        if let (Some(start), Some(end)) = (slot.start, slot.end) {
            by_identity
                .entry((slot.channel_key.clone(), start, end, slot.event.clone()))
                .or_default()
                .push(idx);
        }
    }
    for ((channel_key, _, _, _), indices) in &by_identity {
        if indices.len() < 2 {
            continue;
        }
        let markets: std::collections::BTreeSet<&str> = indices
            .iter()
            .map(|idx| slots[*idx].market.as_str())
            .collect();
        let simulcast = markets.len() > 1
            && indices.iter().any(|idx| {
                dup_channels.contains(channel_key)
                    || dup_channels.contains(&slots[*idx].channel_name)
            });
        for idx in indices {
            if simulcast {
                duplicate.set(
                    *idx,
                    CheckStatus::Pass,
                    "Simulcast across duplicated markets",
                );
            } else {
                duplicate.set(*idx, CheckStatus::Fail, "Duplicate row found");
            }
        }
    }

    Ok(vec![
        (OVERLAP.to_string(), overlap),
        (DUPLICATE.to_string(), duplicate),
        (DAYBREAK.to_string(), daybreak),
    ])
}
