//! End-to-end pipeline tests over generated xlsx workbooks.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use brqc_cli::cli::RunArgs;
use brqc_cli::pipeline::{load_config, run_qc};
use brqc_ingest::{open_workbook, read_sheet, sheet_names};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("brqc-pipeline-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_row(sheet: &mut rust_xlsxwriter::Worksheet, row: u32, values: &[&str]) {
    for (col, value) in values.iter().enumerate() {
        sheet
            .write_string(row, col as u16, *value)
            .expect("write cell");
    }
}

fn build_bsr_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("August BSR").expect("sheet name");
    write_row(sheet, 0, &["Broadcast Schedule Report"]);
    write_row(sheet, 1, &["Monitoring Period", "2024-08-01", "2024-08-31"]);
    write_row(
        sheet,
        3,
        &[
            "Market",
            "Market ID",
            "TV Channel",
            "Channel ID",
            "Date",
            "Start (UTC)",
            "End (UTC)",
            "Type of Program",
            "Matchday",
            "Home Team",
            "Away Team",
            "Event",
            "Competition",
            "Audience Estimates",
            "Audience Metered",
            "Source",
            "Pay/Free TV",
            "Program Description",
        ],
    );
    write_row(
        sheet,
        4,
        &[
            "Spain",
            "1",
            "DAZN",
            "77",
            "2024-08-10",
            "20:15:00",
            "23:20:00",
            "Live",
            "5",
            "Alpha",
            "Beta",
            "Alpha vs Beta",
            "LaLiga",
            "120",
            "",
            "Client",
            "Client Pay",
            "Full match",
        ],
    );
    write_row(
        sheet,
        5,
        &[
            "Spain",
            "1",
            "DAZN",
            "77",
            "2024-08-10",
            "10:00:00",
            "10:45:00",
            "Highlights",
            "5",
            "",
            "",
            "Roundup",
            "LaLiga",
            "",
            "40",
            "Client",
            "OTT Free",
            "Matchday roundup",
        ],
    );

    let fixtures = workbook.add_worksheet();
    fixtures.set_name("Fixture List").expect("sheet name");
    write_row(
        fixtures,
        0,
        &["Event", "Home Team", "Away Team", "Date", "Start Time", "Matchday"],
    );
    write_row(
        fixtures,
        1,
        &["Alpha vs Beta", "Alpha", "Beta", "2024-08-10", "20:00:00", "5"],
    );
    workbook.save(path).expect("save bsr workbook");
}

#[test]
fn run_produces_an_annotated_report() {
    let dir = temp_dir("report");
    let bsr = dir.join("august.xlsx");
    build_bsr_workbook(&bsr);

    let args = RunArgs {
        bsr: bsr.clone(),
        rosco: None,
        macro_file: None,
        config: None,
        output_dir: Some(dir.clone()),
        dry_run: false,
    };
    let outcome = run_qc(&args).expect("pipeline run");
    assert_eq!(outcome.rows, 2);
    assert!(outcome.errors.is_empty(), "errors: {:?}", outcome.errors);
    assert_eq!(outcome.period.to_string(), "2024-08-01 to 2024-08-31");
    let report = outcome.report.as_ref().expect("report path");
    assert_eq!(report.file_name().unwrap(), "QC_august.xlsx");
    assert!(report.exists());

    let mut workbook = open_workbook(report).expect("open report");
    let names = sheet_names(&workbook);
    assert!(names.contains(&"QC Report".to_string()));
    assert!(names.contains(&"Summary".to_string()));
    let grid = read_sheet(&mut workbook, "QC Report").expect("read report sheet");
    let header = &grid.rows[0];
    assert!(header.contains(&"Market".to_string()));
    assert!(header.contains(&"Completeness_OK".to_string()));
    assert!(header.contains(&"Client_LSTV_OTT_Remark".to_string()));
    // Row for the live match: completeness passes.
    let ok_idx = header.iter().position(|h| h == "Completeness_OK").unwrap();
    assert_eq!(grid.rows[1][ok_idx], "TRUE");

    // A clean delivery exits without failures.
    assert!(!outcome.has_failures(), "{:?}", outcome.summaries);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn dry_run_skips_the_report_file() {
    let dir = temp_dir("dry-run");
    let bsr = dir.join("august.xlsx");
    build_bsr_workbook(&bsr);

    let args = RunArgs {
        bsr,
        rosco: None,
        macro_file: None,
        config: None,
        output_dir: Some(dir.clone()),
        dry_run: true,
    };
    let outcome = run_qc(&args).expect("pipeline run");
    assert!(outcome.report.is_none());
    assert!(!outcome.summaries.is_empty());
    assert!(!dir.join("QC_august.xlsx").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn config_defaults_apply_without_a_file() {
    let config = load_config(None).expect("default config");
    assert_eq!(config.file_rules.output_prefix, "QC_");
    assert_eq!(config.qc_rules.program_category.bsa_max_duration, 180);
}

#[test]
fn partial_config_file_overrides_only_named_fields() {
    let dir = temp_dir("config");
    let path = dir.join("config.json");
    std::fs::write(
        &path,
        r#"{ "project_rules": { "league_keyword": "F24 Italy" } }"#,
    )
    .expect("write config");
    let config = load_config(Some(&path)).expect("load config");
    assert_eq!(config.project_rules.league_keyword, "F24 Italy");
    assert_eq!(config.file_rules.output_prefix, "QC_");
    std::fs::remove_dir_all(&dir).ok();
}
