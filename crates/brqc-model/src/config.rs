//! Run configuration for the QC engine.
//!
//! Everything the checks consult at runtime lives here and is passed in by
//! the caller; the engine keeps no process-wide settings. Defaults mirror the
//! header spellings and thresholds observed in production BSR deliveries, so
//! an empty config file yields a working setup for the common projects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Logical role -> candidate header names, in priority order.
pub type RoleMap = BTreeMap<String, Vec<String>>;

fn roles(entries: &[(&str, &[&str])]) -> RoleMap {
    entries
        .iter()
        .map(|(role, candidates)| {
            (
                (*role).to_string(),
                candidates.iter().map(|c| (*c).to_string()).collect(),
            )
        })
        .collect()
}

/// Column synonym maps, one per source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMappings {
    pub bsr: RoleMap,
    pub fixture: RoleMap,
    pub rosco: RoleMap,
    #[serde(rename = "macro")]
    pub macro_rules: RoleMap,
}

impl Default for ColumnMappings {
    fn default() -> Self {
        Self {
            bsr: roles(&[
                ("market", &["Market", "Country"]),
                ("market_id", &["Market ID", "MarketID"]),
                ("tv_channel", &["TV Channel", "TV-Channel", "Channel"]),
                ("channel_id", &["Channel ID", "ChannelID", "Channel Id"]),
                ("date", &["Date (UTC/GMT)", "Date (UTC)", "Date"]),
                ("start_time", &["Start (UTC)", "Start Time", "Start"]),
                ("end_time", &["End (UTC)", "End Time", "End"]),
                ("duration", &["Duration", "Duration (hh:mm:ss)"]),
                (
                    "type_of_program",
                    &["Type of Program", "Type of programme", "Type of program"],
                ),
                ("match_day", &["Matchday", "Match Day"]),
                ("home_team", &["Home Team", "HomeTeam", "Home"]),
                ("away_team", &["Away Team", "AwayTeam", "Away"]),
                ("event", &["Event"]),
                ("competition", &["Competition"]),
                (
                    "aud_estimates",
                    &[
                        "Aud. Estimates ['000s]",
                        "Audience Estimates",
                        "Aud Estimates",
                    ],
                ),
                (
                    "aud_metered",
                    &[
                        "Aud Metered (000s) 3+",
                        "Aud. Metered (000s) 3+",
                        "Audience Metered",
                    ],
                ),
                (
                    "source",
                    &["Source", "Audience Source", "AudienceSource", "Audience_Source"],
                ),
                ("pay_free", &["Pay/Free TV", "Pay/Free"]),
                (
                    "program_description",
                    &["Program Description", "Programme Description"],
                ),
            ]),
            fixture: roles(&[
                ("event", &["Event", "Competition"]),
                ("home_team", &["Home Team", "HomeTeam", "Home"]),
                ("away_team", &["Away Team", "AwayTeam", "Away"]),
                ("date", &["Date", "Match Date"]),
                ("start_time", &["Start Time", "Kick-off", "Start"]),
                ("match_day", &["Matchday", "Match Day", "Round"]),
            ]),
            rosco: roles(&[
                ("channel_country", &["ChannelCountry", "Channel Country"]),
                ("channel_name", &["ChannelName", "Channel Name"]),
            ]),
            macro_rules: roles(&[
                ("project", &["Projects", "Project"]),
                ("origin_market", &["Market", "Origin Market"]),
                ("origin_channel", &["Channel", "Origin Channel"]),
                ("dup_market", &["Dup Market", "Duplicate Market"]),
                ("dup_channel", &["Dup Channel", "Duplicate Channel"]),
            ]),
        }
    }
}

/// Thresholds for the program-category and duration logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramCategoryRules {
    /// Minutes a first broadcast may start after the scheduled kick-off and
    /// still count as live.
    pub live_tolerance_min: i64,
    /// Expected full-match broadcast slot length in minutes.
    pub bsa_max_duration: i64,
    /// Accepted duration band for magazine/support programming.
    pub support_duration_min: i64,
    pub support_duration_max: i64,
    /// Declared types that describe a full match broadcast.
    pub live_types: Vec<String>,
    /// Declared types validated on duration only, never fixture-matched.
    pub relaxed_types: Vec<String>,
}

impl Default for ProgramCategoryRules {
    fn default() -> Self {
        Self {
            live_tolerance_min: 30,
            bsa_max_duration: 180,
            support_duration_min: 5,
            support_duration_max: 90,
            live_types: vec![
                "live".to_string(),
                "repeat".to_string(),
                "delayed".to_string(),
            ],
            relaxed_types: vec![
                "highlights".to_string(),
                "magazine".to_string(),
                "support".to_string(),
                "magazine and support".to_string(),
            ],
        }
    }
}

/// Thresholds for the overlap / duplicate / daybreak logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapRules {
    /// Largest acceptable gap (minutes) between consecutive broadcasts on the
    /// same channel before the gap is flagged as a daybreak.
    pub daybreak_gap_tolerance_min: i64,
    /// Platform keywords exempt from overlap detection (internet delivery is
    /// not bound to a linear schedule).
    pub ignore_platforms: Vec<String>,
}

impl Default for OverlapRules {
    fn default() -> Self {
        Self {
            daybreak_gap_tolerance_min: 2,
            ignore_platforms: vec![
                "ott".to_string(),
                "internet".to_string(),
                "www".to_string(),
            ],
        }
    }
}

/// Keywords expected in the pay/free descriptor field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRules {
    pub keywords: Vec<String>,
}

impl Default for ClientRules {
    fn default() -> Self {
        Self {
            keywords: vec![
                "client".to_string(),
                "lstv".to_string(),
                "ott".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QcRules {
    pub program_category: ProgramCategoryRules,
    pub overlap_check: OverlapRules,
    pub client_check: ClientRules,
}

/// Project-specific keywords (league and domestic-coverage scope).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRules {
    /// League identifier as it appears in the macro workbook and in the
    /// competition/event free text.
    pub league_keyword: String,
    /// Market name whose coverage is contractually guaranteed.
    pub domestic_market: String,
    /// Competition/event keywords identifying the domestic league.
    pub domestic_league_keywords: Vec<String>,
}

impl Default for ProjectRules {
    fn default() -> Self {
        Self {
            league_keyword: "F24 Spain".to_string(),
            domestic_market: "Spain".to_string(),
            domestic_league_keywords: vec![
                "F24 Spain".to_string(),
                "LaLiga".to_string(),
                "Liga".to_string(),
                "Primera".to_string(),
                "Segunda".to_string(),
            ],
        }
    }
}

/// Workbook structure settings: sheet names, header placement, output naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRules {
    /// Substring identifying the fixture-list sheet inside the BSR workbook.
    pub fixture_sheet_keyword: String,
    /// Substring identifying the Rosco sheet to skip (general information).
    pub rosco_ignore_sheet: String,
    /// Sheet holding the duplication rules in the macro workbook.
    pub macro_sheet_name: String,
    /// Zero-based row index of the macro sheet header.
    pub macro_header_row: usize,
    /// Tokens that identify the real BSR header row; a row containing at
    /// least two of them (case-insensitive) is taken as the header.
    pub header_anchor_tokens: Vec<String>,
    /// How many leading rows to scan for the header.
    pub header_scan_rows: usize,
    pub output_prefix: String,
    pub output_sheet_name: String,
    pub summary_sheet_name: String,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            fixture_sheet_keyword: "fixture".to_string(),
            rosco_ignore_sheet: "general".to_string(),
            macro_sheet_name: "Data Core".to_string(),
            macro_header_row: 1,
            header_anchor_tokens: vec![
                "market".to_string(),
                "channel".to_string(),
                "date".to_string(),
                "broadcaster".to_string(),
                "region".to_string(),
            ],
            header_scan_rows: 200,
            output_prefix: "QC_".to_string(),
            output_sheet_name: "QC Report".to_string(),
            summary_sheet_name: "Summary".to_string(),
        }
    }
}

/// Complete configuration for one QC run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QcConfig {
    pub column_mappings: ColumnMappings,
    pub qc_rules: QcRules,
    pub project_rules: ProjectRules,
    pub file_rules: FileRules,
}

impl QcConfig {
    /// Validate the parts a run cannot proceed without. Called by drivers
    /// before any workbook is opened, so a bad file fails fast.
    pub fn validate(&self) -> crate::Result<()> {
        if self.column_mappings.bsr.is_empty() {
            return Err(crate::QcError::Config(
                "column_mappings.bsr must not be empty".to_string(),
            ));
        }
        if self.file_rules.header_anchor_tokens.len() < 2 {
            return Err(crate::QcError::Config(
                "file_rules.header_anchor_tokens needs at least two tokens".to_string(),
            ));
        }
        if self.file_rules.header_scan_rows == 0 {
            return Err(crate::QcError::Config(
                "file_rules.header_scan_rows must be positive".to_string(),
            ));
        }
        if self.qc_rules.program_category.support_duration_min
            > self.qc_rules.program_category.support_duration_max
        {
            return Err(crate::QcError::Config(
                "qc_rules.program_category support duration band is inverted".to_string(),
            ));
        }
        Ok(())
    }

    /// Candidate headers for a role in the main BSR table.
    pub fn bsr_candidates(&self, role: &str) -> &[String] {
        candidates(&self.column_mappings.bsr, role)
    }

    pub fn fixture_candidates(&self, role: &str) -> &[String] {
        candidates(&self.column_mappings.fixture, role)
    }

    pub fn rosco_candidates(&self, role: &str) -> &[String] {
        candidates(&self.column_mappings.rosco, role)
    }

    pub fn macro_candidates(&self, role: &str) -> &[String] {
        candidates(&self.column_mappings.macro_rules, role)
    }
}

fn candidates<'a>(map: &'a RoleMap, role: &str) -> &'a [String] {
    map.get(role).map(Vec::as_slice).unwrap_or(&[])
}
