//! Workbook reading on top of calamine.
//!
//! Every sheet is materialized as a grid of strings before anything else
//! looks at it. Stringifying once, deterministically, keeps the header
//! detector, the period detector, and the checks on a single representation
//! regardless of how Excel typed the cells.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

pub type Workbook = Sheets<BufReader<File>>;

/// One sheet, fully read, cells stringified.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

pub fn open_workbook(path: &Path) -> Result<Workbook> {
    open_workbook_auto(path).with_context(|| format!("open workbook: {}", path.display()))
}

pub fn sheet_names(workbook: &Workbook) -> Vec<String> {
    workbook.sheet_names().to_vec()
}

/// Find a sheet whose name contains the keyword, case-insensitive.
pub fn find_sheet(names: &[String], keyword: &str) -> Option<String> {
    let keyword = keyword.to_lowercase();
    names
        .iter()
        .find(|name| name.to_lowercase().contains(&keyword))
        .cloned()
}

pub fn read_sheet(workbook: &mut Workbook, name: &str) -> Result<SheetGrid> {
    let range = workbook
        .worksheet_range(name)
        .with_context(|| format!("read sheet: {name}"))?;
    Ok(SheetGrid {
        name: name.to_string(),
        rows: range_to_rows(&range),
    })
}

/// Read every sheet in the workbook.
pub fn read_all_sheets(workbook: &mut Workbook) -> Result<Vec<SheetGrid>> {
    let names = sheet_names(workbook);
    let mut grids = Vec::with_capacity(names.len());
    for name in names {
        grids.push(read_sheet(workbook, &name)?);
    }
    Ok(grids)
}

fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect()
}

/// Deterministic cell-to-text conversion.
///
/// Integral floats print without a trailing `.0` so identifiers like channel
/// IDs survive Excel's numeric typing, and date/time cells come out in the
/// ISO forms the rest of the engine parses.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) => format_numeric(*value),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => {
            if *value {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::Error(error) => format!("#{error:?}"),
        Data::DateTime(value) => {
            let serial = value.as_f64();
            match value.as_datetime() {
                Some(dt) if serial < 1.0 => dt.format("%H:%M:%S").to_string(),
                Some(dt) if serial.fract().abs() < 1e-9 => dt.format("%Y-%m-%d").to_string(),
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => format_numeric(serial),
            }
        }
        Data::DateTimeIso(value) => value.trim().to_string(),
        Data::DurationIso(value) => value.trim().to_string(),
    }
}

pub fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_drop_the_decimal() {
        assert_eq!(cell_to_string(&Data::Float(12.0)), "12");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
    }

    #[test]
    fn strings_are_trimmed_and_empty_stays_empty() {
        assert_eq!(cell_to_string(&Data::String("  Market ".to_string())), "Market");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn find_sheet_matches_substring_case_insensitively() {
        let names = vec![
            "General Information".to_string(),
            "Fixture List".to_string(),
        ];
        assert_eq!(find_sheet(&names, "fixture"), Some("Fixture List".to_string()));
        assert_eq!(find_sheet(&names, "macro"), None);
    }
}
