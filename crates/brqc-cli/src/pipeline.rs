//! QC run pipeline with explicit stages.
//!
//! 1. **Configure**: load the JSON config (or the defaults) and validate it
//! 2. **Ingest**: read the BSR data sheet, detect its header, load the table
//! 3. **References**: fixture sheet from the same workbook, Rosco roster and
//!    monitoring period, macro duplication rules
//! 4. **Check**: run the full battery, annotating the table
//! 5. **Report**: tally the summary and write the annotated workbook

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use polars::prelude::DataFrame;
use tracing::{info, warn};

use brqc_checks::{RunContext, run_checks};
use brqc_ingest::{
    MacroRule, RosterPairs, SheetGrid, detect_period, find_sheet, load_fixture_table,
    load_macro_rules, load_roster_pairs, load_table, open_workbook, read_all_sheets, read_sheet,
    sheet_names,
};
use brqc_model::{MonitoringPeriod, QcConfig, QcError};
use brqc_report::{CheckSummary, report_path, summarize, write_report};

use crate::cli::RunArgs;

/// What one QC run produced, for the console summary.
#[derive(Debug)]
pub struct RunOutcome {
    pub source: PathBuf,
    pub report: Option<PathBuf>,
    pub period: MonitoringPeriod,
    pub rows: usize,
    pub summaries: Vec<CheckSummary>,
    /// Internal check failures, already reflected in the annotated table.
    pub errors: Vec<String>,
}

impl RunOutcome {
    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty() || self.summaries.iter().any(CheckSummary::has_failures)
    }
}

/// Load the run configuration. A missing `--config` means the defaults; a
/// present but unreadable one is an error rather than a silent fallback.
pub fn load_config(path: Option<&Path>) -> Result<QcConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<QcConfig>(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => QcConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

struct BsrInput {
    table: DataFrame,
    data_grid: SheetGrid,
    fixture: Option<DataFrame>,
}

fn load_bsr(path: &Path, config: &QcConfig) -> Result<BsrInput> {
    let mut workbook = open_workbook(path)?;
    let names = sheet_names(&workbook);
    let Some(data_sheet) = names.first().cloned() else {
        bail!("{} contains no sheets", path.display());
    };
    let data_grid = read_sheet(&mut workbook, &data_sheet)?;
    let table = load_table(
        &data_grid,
        &config.file_rules.header_anchor_tokens,
        config.file_rules.header_scan_rows,
    )
    .with_context(|| format!("no data table found in {}", path.display()))?;

    let fixture = match find_sheet(&names, &config.file_rules.fixture_sheet_keyword) {
        Some(name) => {
            let grid = read_sheet(&mut workbook, &name)?;
            Some(load_fixture_table(&grid)?)
        }
        None => {
            warn!(
                keyword = %config.file_rules.fixture_sheet_keyword,
                "no fixture sheet in the BSR workbook"
            );
            None
        }
    };
    info!(
        sheet = %data_sheet,
        rows = table.height(),
        columns = table.width(),
        fixture = fixture.is_some(),
        "loaded BSR workbook"
    );
    Ok(BsrInput {
        table,
        data_grid,
        fixture,
    })
}

fn load_rosco(path: &Path, config: &QcConfig) -> Result<(Option<MonitoringPeriod>, RosterPairs)> {
    let mut workbook = open_workbook(path)?;
    let grids = read_all_sheets(&mut workbook)?;
    let period = grids.iter().find_map(|grid| detect_period(grid).ok());
    if period.is_none() {
        warn!(path = %path.display(), "no monitoring period found in the Rosco workbook");
    }
    let roster = load_roster_pairs(&grids, config)?;
    Ok((period, roster))
}

fn load_macro(path: &Path, config: &QcConfig) -> Result<Vec<MacroRule>> {
    let mut workbook = open_workbook(path)?;
    let names = sheet_names(&workbook);
    let sheet = names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(&config.file_rules.macro_sheet_name))
        .cloned()
        .or_else(|| names.first().cloned())
        .ok_or_else(|| QcError::SheetNotFound(config.file_rules.macro_sheet_name.clone()))?;
    let grid = read_sheet(&mut workbook, &sheet)?;
    load_macro_rules(&grid, config).context("failed to parse macro duplication rules")
}

/// Execute one full QC run.
pub fn run_qc(args: &RunArgs) -> Result<RunOutcome> {
    let config = load_config(args.config.as_deref())?;

    let bsr = load_bsr(&args.bsr, &config)?;
    let mut table = bsr.table;

    let (rosco_period, roster) = match &args.rosco {
        Some(path) => {
            let (period, roster) = load_rosco(path, &config)?;
            (period, Some(roster))
        }
        None => (None, None),
    };
    // The period normally lives in the Rosco workbook; a BSR delivered with
    // its own period header still works without one.
    let period = match rosco_period {
        Some(period) => period,
        None => detect_period(&bsr.data_grid).context("no monitoring period found")?,
    };
    info!(period = %period, "monitoring period resolved");

    let macro_rules = match &args.macro_file {
        Some(path) => Some(load_macro(path, &config)?),
        None => None,
    };

    let ctx = RunContext {
        config: &config,
        period,
        fixture: bsr.fixture.as_ref(),
        roster: roster.as_ref(),
        macro_rules: macro_rules.as_deref(),
    };
    let engine_report = run_checks(&mut table, &ctx)?;
    let summaries = summarize(&table);

    let report = if args.dry_run {
        None
    } else {
        if let Some(dir) = &args.output_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let path = report_path(&args.bsr, args.output_dir.as_deref(), &config);
        write_report(&table, &summaries, &config, &path)?;
        Some(path)
    };

    Ok(RunOutcome {
        source: args.bsr.clone(),
        report,
        period,
        rows: table.height(),
        summaries,
        errors: engine_report.errors,
    })
}
