//! Per-check tallies over an annotated table.

use polars::prelude::DataFrame;
use serde::Serialize;

use brqc_ingest::column_values;
use brqc_model::{CheckStatus, parse_status};

pub const OK_SUFFIX: &str = "_OK";

#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub check: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_applicable: usize,
    pub errors: usize,
}

impl CheckSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errors > 0
    }
}

/// Tally every `_OK` column in table order. Cells that parse as no known
/// status count as errors, so a corrupted report is visible in the summary.
pub fn summarize(df: &DataFrame) -> Vec<CheckSummary> {
    df.get_column_names()
        .iter()
        .filter_map(|name| {
            let name = name.as_str();
            let check = name.strip_suffix(OK_SUFFIX)?;
            let values = column_values(df, name);
            let mut summary = CheckSummary {
                check: check.to_string(),
                total: values.len(),
                passed: 0,
                failed: 0,
                not_applicable: 0,
                errors: 0,
            };
            for value in &values {
                match parse_status(value) {
                    Some(CheckStatus::Pass) => summary.passed += 1,
                    Some(CheckStatus::Fail) => summary.failed += 1,
                    Some(CheckStatus::NotApplicable) => summary.not_applicable += 1,
                    Some(CheckStatus::Error) | None => summary.errors += 1,
                }
            }
            Some(summary)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn tallies_statuses_per_check_column() {
        let frame = df! {
            "Market" => ["Spain", "Spain", "Italy"],
            "Completeness_OK" => ["TRUE", "FALSE", "TRUE"],
            "Completeness_Remark" => ["", "TV Channel", ""],
            "Overlap_OK" => ["TRUE", "Not Applicable", "Error"],
        }
        .unwrap();
        let summaries = summarize(&frame);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].check, "Completeness");
        assert_eq!(summaries[0].passed, 2);
        assert_eq!(summaries[0].failed, 1);
        assert!(summaries[0].has_failures());
        assert_eq!(summaries[1].check, "Overlap");
        assert_eq!(summaries[1].not_applicable, 1);
        assert_eq!(summaries[1].errors, 1);
    }

    #[test]
    fn unparseable_status_counts_as_error() {
        let frame = df! { "X_OK" => ["maybe"] }.unwrap();
        let summaries = summarize(&frame);
        assert_eq!(summaries[0].errors, 1);
        assert_eq!(summaries[0].passed, 0);
    }

    #[test]
    fn summary_serializes_for_machine_consumption() {
        let frame = df! { "Completeness_OK" => ["TRUE"] }.unwrap();
        let summaries = summarize(&frame);
        let json = serde_json::to_value(&summaries).unwrap();
        assert_eq!(json[0]["check"], "Completeness");
        assert_eq!(json[0]["passed"], 1);
    }
}
