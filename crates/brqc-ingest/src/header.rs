//! Header-row detection and DataFrame construction for the main dataset.
//!
//! BSR deliveries carry a variable number of title and metadata rows before
//! the real header, so the loader scans the leading rows for one that
//! mentions enough of the configured anchor column tokens.

use anyhow::Result;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::debug;

use brqc_model::QcError;

use crate::workbook::SheetGrid;

/// Scan the leading rows of a grid for the header row.
///
/// A row qualifies when its concatenated lowercase text contains at least two
/// distinct anchor tokens. Returns the zero-based row index.
pub fn detect_header_row(
    grid: &SheetGrid,
    anchor_tokens: &[String],
    scan_rows: usize,
) -> Result<usize, QcError> {
    let scanned = grid.rows.len().min(scan_rows);
    for (index, row) in grid.rows.iter().take(scan_rows).enumerate() {
        let flattened = row.join(" ").to_lowercase();
        let hits = anchor_tokens
            .iter()
            .filter(|token| !token.trim().is_empty())
            .filter(|token| flattened.contains(&token.trim().to_lowercase()))
            .count();
        if hits >= 2 {
            debug!(row = index, hits, "detected header row");
            return Ok(index);
        }
    }
    Err(QcError::HeaderNotFound {
        file: grid.name.clone(),
        scanned,
    })
}

/// Collapse internal whitespace runs and strip BOM/outer whitespace from a
/// raw header cell.
fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Unique, non-empty header names in sheet order. Blank headers become
/// positional names and repeats get a numeric suffix, since the frame layer
/// requires unique column names.
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashMap::<String, usize>::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (index, cell) in raw.iter().enumerate() {
        let mut name = normalize_header(cell);
        if name.is_empty() {
            name = format!("Column {}", index + 1);
        }
        let count = seen.entry(name.to_lowercase()).or_insert(0);
        *count += 1;
        if *count > 1 {
            name = format!("{name} ({count})");
        }
        headers.push(name);
    }
    headers
}

/// Build a string-typed DataFrame from a grid with the header at the given
/// row index. Rows above the header are discarded; rows below keep their
/// sheet order. Short rows are padded with empty cells.
pub fn grid_to_frame(grid: &SheetGrid, header_index: usize) -> Result<DataFrame> {
    let Some(header_row) = grid.rows.get(header_index) else {
        return Ok(DataFrame::default());
    };
    let headers = unique_headers(header_row);
    let data_rows = &grid.rows[header_index + 1..];

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let values: Vec<String> = data_rows
            .iter()
            .map(|row| row.get(col_idx).map(String::as_str).unwrap_or("").to_string())
            .collect();
        columns.push(Series::new(header.as_str().into(), values).into());
    }
    Ok(DataFrame::new(columns)?)
}

/// Detect the header and load the grid as a DataFrame in one step.
pub fn load_table(
    grid: &SheetGrid,
    anchor_tokens: &[String],
    scan_rows: usize,
) -> Result<DataFrame> {
    let header_index = detect_header_row(grid, anchor_tokens, scan_rows)?;
    grid_to_frame(grid, header_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> SheetGrid {
        SheetGrid {
            name: "BSR".to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        }
    }

    fn anchors() -> Vec<String> {
        ["market", "channel", "date"]
            .iter()
            .map(|token| (*token).to_string())
            .collect()
    }

    #[test]
    fn header_found_below_metadata_rows() {
        let grid = grid(&[
            &["Quarterly BSR Report"],
            &["Prepared 2024-02-01", ""],
            &["Market", "TV Channel", "Date (UTC/GMT)"],
            &["Spain", "TVE", "2024-01-05"],
        ]);
        assert_eq!(detect_header_row(&grid, &anchors(), 200).unwrap(), 2);
    }

    #[test]
    fn missing_header_is_an_error() {
        let grid = grid(&[&["title"], &["notes", "more notes"]]);
        let error = detect_header_row(&grid, &anchors(), 200).unwrap_err();
        assert!(matches!(error, QcError::HeaderNotFound { .. }));
    }

    #[test]
    fn single_anchor_token_is_not_enough() {
        let grid = grid(&[&["Market overview commentary"], &["Market", "Channel"]]);
        assert_eq!(detect_header_row(&grid, &anchors(), 200).unwrap(), 1);
    }

    #[test]
    fn frame_keeps_row_order_and_pads_short_rows() {
        let grid = grid(&[
            &["Market", "TV Channel", "Date (UTC/GMT)"],
            &["Spain", "TVE"],
            &["Italy", "Rai 1", "2024-01-06"],
        ]);
        let df = grid_to_frame(&grid, 0).expect("frame");
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
            vec!["Market", "TV Channel", "Date (UTC/GMT)"]
        );
    }

    #[test]
    fn duplicate_and_blank_headers_are_disambiguated() {
        let grid = grid(&[
            &["Market", "", "Market", "  Channel   ID "],
            &["a", "b", "c", "d"],
        ]);
        let df = grid_to_frame(&grid, 0).expect("frame");
        let names: Vec<_> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Market", "Column 2", "Market (2)", "Channel ID"]);
    }
}
