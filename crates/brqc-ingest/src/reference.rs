//! Reference-document loaders: fixture list, Rosco roster, macro
//! duplication rules. All reference data is loaded fresh per run so operator
//! edits to the reference files are picked up immediately.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use polars::prelude::DataFrame;
use regex::Regex;
use tracing::{debug, warn};

use brqc_model::{ColumnResolver, QcConfig};

use crate::header::grid_to_frame;
use crate::workbook::SheetGrid;

/// Valid (market, channel) pairs from the Rosco roster. Markets are
/// lowercased, channels pass through [`normalize_channel`].
pub type RosterPairs = BTreeSet<(String, String)>;

/// One cross-market simulcast rule from the macro workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroRule {
    pub project: String,
    pub origin_market: String,
    pub origin_channel: String,
    pub dup_market: String,
    pub dup_channel: String,
}

/// Normalize a channel name for roster comparison: drop parenthetical and
/// bracketed qualifiers, drop anything after a dash, keep alphanumerics and
/// spaces, collapse whitespace, lowercase. Only lookups use the normalized
/// form; table cells are never rewritten.
pub fn normalize_channel(name: &str) -> String {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let brackets = BRACKETS.get_or_init(|| Regex::new(r"\(.*?\)|\[.*?\]").expect("valid pattern"));
    let non_alnum =
        NON_ALNUM.get_or_init(|| Regex::new(r"[^0-9A-Za-z\s]").expect("valid pattern"));

    let without_brackets = brackets.replace_all(name, "");
    let before_dash = without_brackets
        .split(['-', '\u{2013}', '\u{2014}'])
        .next()
        .unwrap_or("");
    let cleaned = non_alnum.replace_all(before_dash, " ");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Load the fixture list from its sheet. Fixture sheets carry their header
/// on the first row.
pub fn load_fixture_table(grid: &SheetGrid) -> Result<DataFrame> {
    let frame = grid_to_frame(grid, 0)?;
    debug!(sheet = %grid.name, rows = frame.height(), "loaded fixture list");
    Ok(frame)
}

/// Build the valid (market, channel) pair set from Rosco roster sheets,
/// skipping any sheet matching the configured ignore keyword.
pub fn load_roster_pairs(grids: &[SheetGrid], config: &QcConfig) -> Result<RosterPairs> {
    let ignore = config.file_rules.rosco_ignore_sheet.to_lowercase();
    let mut pairs = RosterPairs::new();
    for grid in grids {
        if grid.name.to_lowercase().contains(&ignore) {
            continue;
        }
        let frame = grid_to_frame(grid, 0)?;
        let resolver = ColumnResolver::new(
            frame.get_column_names().iter().map(|name| name.as_str()),
        );
        let Some(country_col) = resolver.resolve(config.rosco_candidates("channel_country"))
        else {
            warn!(sheet = %grid.name, "roster sheet without channel country column, skipped");
            continue;
        };
        let Some(name_col) = resolver.resolve(config.rosco_candidates("channel_name")) else {
            warn!(sheet = %grid.name, "roster sheet without channel name column, skipped");
            continue;
        };
        let country_col = country_col.to_string();
        let name_col = name_col.to_string();
        for idx in 0..frame.height() {
            let market = crate::frame::column_value(&frame, &country_col, idx)
                .trim()
                .to_lowercase();
            let channel = normalize_channel(&crate::frame::column_value(&frame, &name_col, idx));
            if !market.is_empty() && !channel.is_empty() {
                pairs.insert((market, channel));
            }
        }
    }
    debug!(pairs = pairs.len(), "built roster pair set");
    Ok(pairs)
}

/// Parse the macro workbook's duplication rules from its data sheet, with
/// the header at the configured row offset.
pub fn load_macro_rules(grid: &SheetGrid, config: &QcConfig) -> Result<Vec<MacroRule>> {
    let header_row = config.file_rules.macro_header_row;
    let frame = grid_to_frame(grid, header_row)?;
    let resolver =
        ColumnResolver::new(frame.get_column_names().iter().map(|name| name.as_str()));

    let resolve = |role: &str| -> Result<String> {
        resolver
            .resolve(config.macro_candidates(role))
            .map(str::to_string)
            .ok_or_else(|| anyhow!("macro sheet missing column for role '{role}'"))
    };
    let project_col = resolve("project")?;
    let origin_market_col = resolve("origin_market")?;
    let origin_channel_col = resolve("origin_channel")?;
    let dup_market_col = resolve("dup_market")?;
    let dup_channel_col = resolve("dup_channel")?;

    let mut rules = Vec::new();
    for idx in 0..frame.height() {
        let cell = |col: &str| crate::frame::column_value(&frame, col, idx).trim().to_string();
        let rule = MacroRule {
            project: cell(&project_col),
            origin_market: cell(&origin_market_col),
            origin_channel: cell(&origin_channel_col),
            dup_market: cell(&dup_market_col),
            dup_channel: cell(&dup_channel_col),
        };
        // Rows without both endpoints carry no rule.
        if rule.dup_market.is_empty() || rule.origin_market.is_empty() {
            continue;
        }
        rules.push(rule);
    }
    debug!(rules = rules.len(), "loaded macro duplication rules");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(name: &str, rows: &[&[&str]]) -> SheetGrid {
        SheetGrid {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn channel_normalization_strips_qualifiers() {
        assert_eq!(normalize_channel("TVE (HD)"), "tve");
        assert_eq!(normalize_channel("Movistar+ LaLiga - Feed 2"), "movistar laliga");
        assert_eq!(normalize_channel("beIN [intl] Sports"), "bein sports");
        assert_eq!(normalize_channel("  Rai   1  "), "rai 1");
        assert_eq!(normalize_channel(""), "");
    }

    #[test]
    fn roster_pairs_skip_ignored_sheet_and_normalize() {
        let config = QcConfig::default();
        let grids = vec![
            grid(
                "General Information",
                &[&["ChannelCountry", "ChannelName"], &["France", "Ignored"]],
            ),
            grid(
                "Channels",
                &[
                    &["ChannelCountry", "ChannelName"],
                    &["Spain", "TVE (HD)"],
                    &["Italy", "Rai 1 - Feed"],
                    &["", "Orphan"],
                ],
            ),
        ];
        let pairs = load_roster_pairs(&grids, &config).expect("pairs");
        assert!(pairs.contains(&("spain".to_string(), "tve".to_string())));
        assert!(pairs.contains(&("italy".to_string(), "rai 1".to_string())));
        assert!(!pairs.iter().any(|(market, _)| market == "france"));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn macro_rules_respect_header_offset() {
        let config = QcConfig::default();
        let sheet = grid(
            "Data Core",
            &[
                &["Macro Market Duplicator"],
                &["Projects", "Market", "Channel", "Dup Market", "Dup Channel"],
                &["F24 Spain", "Spain", "TVE", "Andorra", "TVE Andorra"],
                &["F24 Spain", "", "", "", ""],
            ],
        );
        let rules = load_macro_rules(&sheet, &config).expect("rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].dup_market, "Andorra");
    }

    #[test]
    fn macro_sheet_without_required_columns_fails() {
        let config = QcConfig::default();
        let sheet = grid("Data Core", &[&["irrelevant"], &["a", "b"]]);
        assert!(load_macro_rules(&sheet, &config).is_err());
    }
}
