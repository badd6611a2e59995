//! Stable name-to-ID assignment for channels and markets.
//!
//! The first ID seen for a name is taken as canonical; any later row pairing
//! the same name with a different ID is flagged. Empty names never enter the
//! maps.

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::column_value;
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::{CheckOutcome, join_remarks};

pub const NAME: &str = "Market_Channel_ID";

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<CheckOutcome> {
    let rows = df.height();
    let cfg = ctx.config;
    let resolver = resolver_for(df);
    let channel_col = resolver.resolve(cfg.bsr_candidates("tv_channel"));
    let channel_id_col = resolver.resolve(cfg.bsr_candidates("channel_id"));
    let market_col = resolver.resolve(cfg.bsr_candidates("market"));
    let market_id_col = resolver.resolve(cfg.bsr_candidates("market_id"));

    let channel_pair = channel_col.zip(channel_id_col);
    let market_pair = market_col.zip(market_id_col);
    if channel_pair.is_none() && market_pair.is_none() {
        return Ok(CheckOutcome::uniform(
            rows,
            CheckStatus::NotApplicable,
            "ID columns not found",
        ));
    }

    let mut channel_ids: HashMap<String, String> = HashMap::new();
    let mut market_ids: HashMap<String, String> = HashMap::new();
    let mut outcome = CheckOutcome::with_capacity(rows);
    for idx in 0..rows {
        let mut problems: Vec<String> = Vec::new();

        if let Some((name_col, id_col)) = channel_pair {
            let name = column_value(df, name_col, idx);
            let id = column_value(df, id_col, idx).trim().to_string();
            let key = name.trim().to_lowercase();
            if !key.is_empty() {
                match channel_ids.get(&key) {
                    Some(first) if *first != id => {
                        problems.push(format!(
                            "Channel '{}' has multiple IDs ({first} vs {id})",
                            name.trim()
                        ));
                    }
                    Some(_) => {}
                    None => {
                        channel_ids.insert(key, id);
                    }
                }
            }
        }

        if let Some((name_col, id_col)) = market_pair {
            let name = column_value(df, name_col, idx);
            let id = column_value(df, id_col, idx).trim().to_string();
            let key = name.trim().to_lowercase();
            if !key.is_empty() {
                match market_ids.get(&key) {
                    Some(first) if *first != id => {
                        problems.push(format!(
                            "Market '{}' has multiple IDs ({first} vs {id})",
                            name.trim()
                        ));
                    }
                    Some(_) => {}
                    None => {
                        market_ids.insert(key, id);
                    }
                }
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
