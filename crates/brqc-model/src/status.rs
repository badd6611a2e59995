use serde::{Deserialize, Serialize};

/// Outcome of one check for one row.
///
/// Rendered into `<Check>_OK` columns as `TRUE` / `FALSE` / `Not Applicable` /
/// `Error`. The two non-boolean states exist because checks degrade rather
/// than abort: out-of-scope rows are `Not Applicable` and a defect inside a
/// check marks the whole column `Error` instead of killing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Pass,
    Fail,
    NotApplicable,
    Error,
}

impl CheckStatus {
    pub fn from_bool(ok: bool) -> Self {
        if ok { Self::Pass } else { Self::Fail }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "TRUE",
            Self::Fail => "FALSE",
            Self::NotApplicable => "Not Applicable",
            Self::Error => "Error",
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an `_OK` cell back into a status. Used when summarizing a table that
/// was annotated by an earlier stage (or a prior run).
pub fn parse_status(value: &str) -> Option<CheckStatus> {
    match value.trim() {
        "TRUE" | "True" | "true" => Some(CheckStatus::Pass),
        "FALSE" | "False" | "false" => Some(CheckStatus::Fail),
        "Not Applicable" => Some(CheckStatus::NotApplicable),
        "Error" => Some(CheckStatus::Error),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_cell_text() {
        for status in [
            CheckStatus::Pass,
            CheckStatus::Fail,
            CheckStatus::NotApplicable,
            CheckStatus::Error,
        ] {
            assert_eq!(parse_status(status.as_str()), Some(status));
        }
        assert_eq!(parse_status(""), None);
        assert_eq!(parse_status("maybe"), None);
    }

    #[test]
    fn from_bool_maps_to_pass_fail() {
        assert!(CheckStatus::from_bool(true).is_pass());
        assert!(CheckStatus::from_bool(false).is_fail());
    }
}
