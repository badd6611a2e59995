//! AnyValue and string-column helpers shared by the checks.

use anyhow::Result;
use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};

pub fn any_to_string(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        other => other.to_string(),
    }
}

/// Tokens that mean "no value" when they appear alone in a cell.
const MISSING_TOKENS: &[&str] = &["", "nan", "none", "null", "n/a", "-"];

/// A cell is present when it holds anything other than a missing-token.
/// Numeric zero is present: `0` is a legitimate audience figure.
pub fn is_present_text(value: &str) -> bool {
    let trimmed = value.trim().replace('\u{a0}', "");
    let lowered = trimmed.to_lowercase();
    !MISSING_TOKENS.contains(&lowered.as_str())
}

/// Cell text at (column, row), empty string when the column is absent.
pub fn column_value(df: &DataFrame, column: &str, idx: usize) -> String {
    match df.column(column) {
        Ok(series) => any_to_string(series.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// All cell texts of a column, top to bottom.
pub fn column_values(df: &DataFrame, column: &str) -> Vec<String> {
    match df.column(column) {
        Ok(series) => (0..df.height())
            .map(|idx| any_to_string(series.get(idx).unwrap_or(AnyValue::Null)))
            .collect(),
        Err(_) => vec![String::new(); df.height()],
    }
}

/// Append or overwrite a string column. Overwriting is deliberate: re-running
/// the pipeline on an already-annotated table must replace old results.
pub fn set_string_column(df: &mut DataFrame, name: &str, values: Vec<String>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn presence_treats_zero_as_present_and_tokens_as_absent() {
        assert!(is_present_text("0"));
        assert!(is_present_text("0.0"));
        assert!(is_present_text("TVE"));
        assert!(!is_present_text(""));
        assert!(!is_present_text("  "));
        assert!(!is_present_text("nan"));
        assert!(!is_present_text("None"));
        assert!(!is_present_text("N/A"));
        assert!(!is_present_text("-"));
    }

    #[test]
    fn set_string_column_overwrites_existing() {
        let mut frame = df! { "Market" => ["Spain", "Italy"] }.unwrap();
        set_string_column(&mut frame, "X_OK", vec!["TRUE".into(), "FALSE".into()]).unwrap();
        set_string_column(&mut frame, "X_OK", vec!["FALSE".into(), "TRUE".into()]).unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(column_value(&frame, "X_OK", 0), "FALSE");
    }

    #[test]
    fn column_value_is_empty_for_missing_columns() {
        let frame = df! { "Market" => ["Spain"] }.unwrap();
        assert_eq!(column_value(&frame, "Nope", 0), "");
    }
}
