//! Column Resolver: maps logical column roles to actual table headers.
//!
//! Every check consults configured candidate header names instead of scanning
//! header strings inline. Resolution is a case-insensitive, whitespace-trimmed
//! exact match, deterministic for a given header list and candidate list, and
//! degrades to `None` rather than failing: a check without its column reports
//! rows as `Not Applicable` or failed with a remark, never aborts the run.

use crate::lookup::CaseInsensitiveSet;

#[derive(Debug, Clone)]
pub struct ColumnResolver {
    headers: CaseInsensitiveSet,
}

impl ColumnResolver {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: CaseInsensitiveSet::new(headers),
        }
    }

    /// Resolve the first candidate that names an actual header.
    ///
    /// Empty candidate lists resolve to `None`.
    pub fn resolve(&self, candidates: &[String]) -> Option<&str> {
        candidates
            .iter()
            .find_map(|candidate| self.headers.get(candidate))
    }

}
