//! Per-check result carriers and table annotation.
//!
//! A check never touches the table directly: it returns a [`CheckOutcome`]
//! with one status and one remark per row (plus optional informational
//! columns), and the engine writes `<Check>_OK` / `<Check>_Remark` columns.
//! Writing goes through `with_column`, so re-running a check replaces its
//! previous answers instead of accumulating new columns.

use anyhow::{Result, ensure};
use polars::prelude::DataFrame;

use brqc_ingest::set_string_column;
use brqc_model::CheckStatus;

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub status: Vec<CheckStatus>,
    pub remark: Vec<String>,
    /// Extra informational columns (full name, values), e.g. the inferred
    /// program category. Written as-is, not status-colored.
    pub extra: Vec<(String, Vec<String>)>,
}

impl CheckOutcome {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            status: Vec::with_capacity(rows),
            remark: Vec::with_capacity(rows),
            extra: Vec::new(),
        }
    }

    /// Every row gets the same status and remark.
    pub fn uniform(rows: usize, status: CheckStatus, remark: &str) -> Self {
        Self {
            status: vec![status; rows],
            remark: vec![remark.to_string(); rows],
            extra: Vec::new(),
        }
    }

    /// The whole check failed internally; the table still gets annotated.
    pub fn error(rows: usize, message: &str) -> Self {
        Self::uniform(rows, CheckStatus::Error, message)
    }

    pub fn push(&mut self, status: CheckStatus, remark: impl Into<String>) {
        self.status.push(status);
        self.remark.push(remark.into());
    }

    pub fn set(&mut self, idx: usize, status: CheckStatus, remark: impl Into<String>) {
        self.status[idx] = status;
        self.remark[idx] = remark.into();
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }
}

/// Write a check's columns onto the table. Row count must match; business
/// columns are never removed or reordered.
pub fn annotate(df: &mut DataFrame, check_name: &str, outcome: &CheckOutcome) -> Result<()> {
    ensure!(
        outcome.len() == df.height(),
        "{check_name}: outcome has {} rows, table has {}",
        outcome.len(),
        df.height()
    );
    let statuses: Vec<String> = outcome
        .status
        .iter()
        .map(|status| status.as_str().to_string())
        .collect();
    set_string_column(df, &format!("{check_name}_OK"), statuses)?;
    set_string_column(df, &format!("{check_name}_Remark"), outcome.remark.clone())?;
    for (name, values) in &outcome.extra {
        ensure!(
            values.len() == df.height(),
            "{check_name}: extra column {name} has {} rows, table has {}",
            values.len(),
            df.height()
        );
        set_string_column(df, name, values.clone())?;
    }
    Ok(())
}

/// Join remark fragments the way the report reads them: semicolon-separated,
/// single line.
pub fn join_remarks(parts: &[String]) -> String {
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn annotate_appends_ok_and_remark_columns() {
        let mut frame = df! { "Market" => ["Spain", "Italy"] }.unwrap();
        let mut outcome = CheckOutcome::with_capacity(2);
        outcome.push(CheckStatus::Pass, "All key fields present");
        outcome.push(CheckStatus::Fail, "TV Channel");
        annotate(&mut frame, "Completeness", &outcome).unwrap();
        assert_eq!(
            brqc_ingest::column_value(&frame, "Completeness_OK", 0),
            "TRUE"
        );
        assert_eq!(
            brqc_ingest::column_value(&frame, "Completeness_Remark", 1),
            "TV Channel"
        );
    }

    #[test]
    fn annotate_rejects_row_count_mismatch() {
        let mut frame = df! { "Market" => ["Spain", "Italy"] }.unwrap();
        let outcome = CheckOutcome::uniform(1, CheckStatus::Pass, "");
        assert!(annotate(&mut frame, "Completeness", &outcome).is_err());
    }
}
