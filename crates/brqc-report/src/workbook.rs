//! Annotated xlsx output.
//!
//! One sheet carries the full table with the reviewer's traffic-light fills
//! on the `_OK` columns, a second sheet carries the per-check tallies. The
//! fill colors match what reviewers already expect from hand-built reports:
//! green for pass, red for fail and error, no fill for not-applicable.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use rust_xlsxwriter::{Color, Format, Workbook};
use tracing::info;

use brqc_ingest::column_value;
use brqc_model::{CheckStatus, QcConfig, parse_status};

use crate::summary::{CheckSummary, OK_SUFFIX};

const FILL_PASS: Color = Color::RGB(0xC6EFCE);
const FILL_FAIL: Color = Color::RGB(0xFFC7CE);
const FILL_HEADER: Color = Color::RGB(0xBDD7EE);

fn status_format<'a>(
    value: &str,
    pass: &'a Format,
    fail: &'a Format,
) -> Option<&'a Format> {
    match parse_status(value)? {
        CheckStatus::Pass => Some(pass),
        CheckStatus::Fail | CheckStatus::Error => Some(fail),
        CheckStatus::NotApplicable => None,
    }
}

/// Write the annotated table and its summary to `path`, overwriting any
/// existing file.
pub fn write_report(
    df: &DataFrame,
    summaries: &[CheckSummary],
    config: &QcConfig,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_background_color(FILL_HEADER);
    let pass_format = Format::new().set_background_color(FILL_PASS);
    let fail_format = Format::new().set_background_color(FILL_FAIL);

    let sheet = workbook.add_worksheet();
    sheet
        .set_name(&config.file_rules.output_sheet_name)
        .context("invalid report sheet name")?;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for (col, name) in names.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }
    for row in 0..df.height() {
        for (col, name) in names.iter().enumerate() {
            let value = column_value(df, name, row);
            let excel_row = (row + 1) as u32;
            let excel_col = col as u16;
            let fill = if name.ends_with(OK_SUFFIX) {
                status_format(&value, &pass_format, &fail_format)
            } else {
                None
            };
            match fill {
                Some(format) => {
                    sheet.write_string_with_format(excel_row, excel_col, &value, format)?;
                }
                None => {
                    sheet.write_string(excel_row, excel_col, &value)?;
                }
            }
        }
    }

    let summary_sheet = workbook.add_worksheet();
    summary_sheet
        .set_name(&config.file_rules.summary_sheet_name)
        .context("invalid summary sheet name")?;
    let headers = ["Check", "Total", "Passed", "Failed", "Not Applicable", "Errors"];
    for (col, header) in headers.iter().enumerate() {
        summary_sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (row, summary) in summaries.iter().enumerate() {
        let excel_row = (row + 1) as u32;
        summary_sheet.write_string(excel_row, 0, &summary.check)?;
        summary_sheet.write_number(excel_row, 1, summary.total as f64)?;
        summary_sheet.write_number(excel_row, 2, summary.passed as f64)?;
        summary_sheet.write_number(excel_row, 3, summary.failed as f64)?;
        summary_sheet.write_number(excel_row, 4, summary.not_applicable as f64)?;
        summary_sheet.write_number(excel_row, 5, summary.errors as f64)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), "report written");
    Ok(())
}

/// Output path for a source workbook: same directory, configured prefix on
/// the file stem, always `.xlsx`.
pub fn report_path(source: &Path, output_dir: Option<&Path>, config: &QcConfig) -> std::path::PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}{stem}.xlsx", config.file_rules.output_prefix))
}
