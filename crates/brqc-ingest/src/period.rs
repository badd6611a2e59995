//! Monitoring-period detection from the Rosco reference document.
//!
//! The period line moves around between projects, so detection is textual
//! rather than positional: find the "Monitoring Period" phrase anywhere in
//! the document, then fall back to scanning the whole document for a date
//! pair, then to lenient slash-date parsing of the matched row.

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use brqc_model::{MonitoringPeriod, QcError, parse_date};

use crate::workbook::SheetGrid;

const ISO_DATE_PATTERN: &str = r"\d{4}-\d{2}-\d{2}";
const SLASH_DATE_PATTERN: &str = r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}";

/// Locate the monitoring period in a raw cell grid.
///
/// Lookup order:
/// 1. first row whose flattened text contains "Monitoring Period": take the
///    first two ISO dates on that row;
/// 2. if the phrase row has no ISO dates, retry it with slash-date forms;
/// 3. if no row carries the phrase, take the first two ISO dates anywhere in
///    the document.
pub fn detect_period(grid: &SheetGrid) -> Result<MonitoringPeriod, QcError> {
    let iso = Regex::new(ISO_DATE_PATTERN).expect("valid iso date pattern");
    let flattened: Vec<String> = grid.rows.iter().map(|row| row.join(" ")).collect();

    let phrase_row = flattened
        .iter()
        .find(|text| text.to_lowercase().contains("monitoring period"));

    if let Some(text) = phrase_row {
        if let Some(period) = first_two_dates(&iso, text, parse_iso_date) {
            debug!(%period, "monitoring period from phrase row");
            return Ok(period);
        }
        let slash = Regex::new(SLASH_DATE_PATTERN).expect("valid slash date pattern");
        if let Some(period) = first_two_dates(&slash, text, |raw| parse_date(raw)) {
            debug!(%period, "monitoring period from slash dates");
            return Ok(period);
        }
        return Err(QcError::PeriodNotFound);
    }

    let all_text = flattened.join(" ");
    if let Some(period) = first_two_dates(&iso, &all_text, parse_iso_date) {
        debug!(%period, "monitoring period from document-wide scan");
        return Ok(period);
    }
    Err(QcError::PeriodNotFound)
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn first_two_dates<F>(pattern: &Regex, text: &str, parse: F) -> Option<MonitoringPeriod>
where
    F: Fn(&str) -> Option<NaiveDate>,
{
    let mut dates = pattern.find_iter(text).filter_map(|m| parse(m.as_str()));
    let start = dates.next()?;
    let end = dates.next()?;
    Some(MonitoringPeriod::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> SheetGrid {
        SheetGrid {
            name: "Rosco".to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn phrase_row_with_iso_dates() {
        let grid = grid(&[
            &["Rosco Reference"],
            &["Monitoring Period", "2024-01-01 to 2024-01-31"],
        ]);
        let period = detect_period(&grid).expect("period");
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 1, 31));
    }

    #[test]
    fn phrase_match_is_case_insensitive() {
        let grid = grid(&[&["monitoring period: 2024-02-01 / 2024-02-29"]]);
        let period = detect_period(&grid).expect("period");
        assert_eq!(period.start, date(2024, 2, 1));
    }

    #[test]
    fn document_wide_scan_without_phrase() {
        let grid = grid(&[
            &["Window start", "2024-03-01"],
            &["Window end", "2024-03-31"],
        ]);
        let period = detect_period(&grid).expect("period");
        assert_eq!(period.start, date(2024, 3, 1));
        assert_eq!(period.end, date(2024, 3, 31));
    }

    #[test]
    fn phrase_row_with_slash_dates() {
        let grid = grid(&[&["Monitoring Period 01/01/2024 - 31/01/2024"]]);
        let period = detect_period(&grid).expect("period");
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 1, 31));
    }

    #[test]
    fn no_dates_anywhere_is_period_not_found() {
        let grid = grid(&[&["no dates here"], &["still nothing"]]);
        assert!(matches!(
            detect_period(&grid),
            Err(QcError::PeriodNotFound)
        ));
    }
}
