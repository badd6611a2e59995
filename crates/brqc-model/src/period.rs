use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The monitoring window for one QC run, parsed once from the reference
/// document and immutable afterwards. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonitoringPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for MonitoringPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn interval_is_closed() {
        let period = MonitoringPeriod::new(date(2024, 1, 1), date(2024, 1, 31));
        assert!(period.contains(date(2024, 1, 1)));
        assert!(period.contains(date(2024, 1, 31)));
        assert!(period.contains(date(2024, 1, 15)));
        assert!(!period.contains(date(2023, 12, 31)));
        assert!(!period.contains(date(2024, 2, 1)));
    }
}
