//! Market/channel pairing against the Rosco roster, and the program
//! description presence check that rides on the same columns.

use anyhow::Result;
use polars::prelude::DataFrame;

use brqc_ingest::{column_value, is_present_text, normalize_channel};
use brqc_model::CheckStatus;

use crate::context::{RunContext, resolver_for};
use crate::outcome::CheckOutcome;

pub const CONSISTENCY: &str = "Market_Channel_Consistency";
pub const DESCRIPTION: &str = "Program_Description";

pub fn run(df: &DataFrame, ctx: &RunContext) -> Result<Vec<(String, CheckOutcome)>> {
    let rows = df.height();
    let cfg = ctx.config;
    let resolver = resolver_for(df);
    let market_col = resolver.resolve(cfg.bsr_candidates("market"));
    let channel_col = resolver.resolve(cfg.bsr_candidates("tv_channel"));
    let description_col = resolver.resolve(cfg.bsr_candidates("program_description"));

    let mut consistency = CheckOutcome::with_capacity(rows);
    for idx in 0..rows {
        let market = market_col
            .map(|name| column_value(df, name, idx))
            .unwrap_or_default();
        let channel = channel_col
            .map(|name| column_value(df, name, idx))
            .unwrap_or_default();
        if !is_present_text(&market) || !is_present_text(&channel) {
            consistency.push(CheckStatus::Fail, "Missing market or channel");
            continue;
        }
        match ctx.roster {
            None => consistency.push(CheckStatus::NotApplicable, "Rosco reference not available"),
            Some(pairs) => {
                let pair = (
                    market.trim().to_lowercase(),
                    normalize_channel(&channel),
                );
                if pairs.contains(&pair) {
                    consistency.push(CheckStatus::Pass, "OK");
                } else {
                    consistency.push(CheckStatus::Fail, "Market+Channel not found in Rosco");
                }
            }
        }
    }

    let description = match description_col {
        None => CheckOutcome::uniform(
            rows,
            CheckStatus::NotApplicable,
            "Program Description column not found",
        ),
        Some(name) => {
            let mut outcome = CheckOutcome::with_capacity(rows);
            for idx in 0..rows {
                if is_present_text(&column_value(df, name, idx)) {
                    outcome.push(CheckStatus::Pass, "");
                } else {
                    outcome.push(CheckStatus::Fail, "Missing program description");
                }
            }
            outcome
        }
    };

    Ok(vec![
        (CONSISTENCY.to_string(), consistency),
        (DESCRIPTION.to_string(), description),
    ])
}
