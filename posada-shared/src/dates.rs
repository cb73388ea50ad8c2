use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days.
///
/// All dates in the system are plain calendar days with no time-of-day or
/// timezone component. Both endpoints belong to the range, so a range of
/// `2025-07-01..2025-07-01` covers exactly one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from two dates in either order.
    pub fn from_unordered(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// True if `date` falls within the range, endpoints included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True if the two ranges share at least one day.
    pub fn overlaps(&self, other: &DayRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of nights spent for a stay over this range.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    #[error("Start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_range_validation() {
        assert!(DayRange::new(d("2025-07-01"), d("2025-07-10")).is_ok());
        assert!(DayRange::new(d("2025-07-01"), d("2025-07-01")).is_ok());
        assert!(DayRange::new(d("2025-07-10"), d("2025-07-01")).is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DayRange::new(d("2025-07-01"), d("2025-07-10")).unwrap();

        assert!(range.contains(d("2025-07-01")));
        assert!(range.contains(d("2025-07-10")));
        assert!(range.contains(d("2025-07-05")));
        assert!(!range.contains(d("2025-06-30")));
        assert!(!range.contains(d("2025-07-11")));
    }

    #[test]
    fn test_from_unordered_normalizes() {
        let forward = DayRange::from_unordered(d("2025-07-03"), d("2025-07-06"));
        let backward = DayRange::from_unordered(d("2025-07-06"), d("2025-07-03"));

        assert_eq!(forward, backward);
        assert_eq!(forward.start, d("2025-07-03"));
        assert_eq!(forward.end, d("2025-07-06"));
    }

    #[test]
    fn test_overlaps() {
        let range = DayRange::new(d("2025-07-05"), d("2025-07-10")).unwrap();

        // Shared edge day counts as overlap
        assert!(range.overlaps(&DayRange::new(d("2025-07-01"), d("2025-07-05")).unwrap()));
        assert!(range.overlaps(&DayRange::new(d("2025-07-10"), d("2025-07-12")).unwrap()));
        assert!(range.overlaps(&DayRange::new(d("2025-07-06"), d("2025-07-08")).unwrap()));
        assert!(!range.overlaps(&DayRange::new(d("2025-07-01"), d("2025-07-04")).unwrap()));
        assert!(!range.overlaps(&DayRange::new(d("2025-07-11"), d("2025-07-20")).unwrap()));
    }

    #[test]
    fn test_nights() {
        let range = DayRange::new(d("2025-07-03"), d("2025-07-06")).unwrap();
        assert_eq!(range.nights(), 3);

        let single = DayRange::new(d("2025-07-03"), d("2025-07-03")).unwrap();
        assert_eq!(single.nights(), 0);
    }
}
