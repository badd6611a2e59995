//! Delivery-source sanity: one market per channel ID, one channel per market
//! ID, and a recognizable Client/LSTV/OTT keyword in the pay/free field.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::column_value;
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::{CheckOutcome, join_remarks};

pub const NAME: &str = "Client_LSTV_OTT";

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let rows = df.height();
    let cfg = ctx.config;
    let resolver = resolver_for(df);
    let channel_id_col = resolver.resolve(cfg.bsr_candidates("channel_id"));
    let market_id_col = resolver.resolve(cfg.bsr_candidates("market_id"));
    let pay_free_col = resolver.resolve(cfg.bsr_candidates("pay_free"));

    let id_pair = channel_id_col.zip(market_id_col);
    if id_pair.is_none() && pay_free_col.is_none() {
        return Ok(CheckOutcome::uniform(
            rows,
            CheckStatus::NotApplicable,
            "Source columns not found",
        ));
    }

    // One pass to learn the full assignment before judging any row.
    let mut channel_markets: HashMap<String, BTreeSet<String>> = HashMap::new();
    let mut market_channels: HashMap<String, BTreeSet<String>> = HashMap::new();
    if let Some((channel_col, market_col)) = id_pair {
        for idx in 0..rows {
            let channel = column_value(df, channel_col, idx).trim().to_string();
            let market = column_value(df, market_col, idx).trim().to_string();
            if channel.is_empty() || market.is_empty() {
                continue;
            }
            channel_markets
                .entry(channel.clone())
                .or_default()
                .insert(market.clone());
            market_channels.entry(market).or_default().insert(channel);
        }
    }

    let keywords: Vec<String> = cfg
        .qc_rules
        .client_check
        .keywords
        .iter()
        .map(|kw| kw.to_lowercase())
        .collect();

    let mut outcome = CheckOutcome::with_capacity(rows);
    for idx in 0..rows {
        let mut problems: Vec<String> = Vec::new();

        if let Some((channel_col, market_col)) = id_pair {
            let channel = column_value(df, channel_col, idx).trim().to_string();
            let market = column_value(df, market_col, idx).trim().to_string();
            if channel_markets.get(&channel).is_some_and(|set| set.len() > 1) {
                problems.push("Channel ID assigned to multiple Market IDs".to_string());
            }
            if market_channels.get(&market).is_some_and(|set| set.len() > 1) {
                problems.push("Market ID assigned to multiple Channel IDs".to_string());
            }
        }

        if let Some(name) = pay_free_col {
            let value = column_value(df, name, idx);
            let lowered = value.to_lowercase();
            if !keywords.iter().any(|kw| lowered.contains(kw)) {
                problems.push(format!(
                    "Missing required source (Client/LSTV/OTT): {}",
                    value.trim()
                ));
            }
        }

        if problems.is_empty() {
            outcome.push(CheckStatus::Pass, "OK");
        } else {
            outcome.push(CheckStatus::Fail, join_remarks(&problems));
        }
    }
    Ok(outcome)
}
