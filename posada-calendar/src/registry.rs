use crate::availability::Availability;
use chrono::NaiveDate;

/// Answers date-coverage questions over one host's full set of
/// availability entries.
///
/// The entry set is small (a handful of ranges per host), so lookups are a
/// plain scan. No merging or cross-entry validation happens here; entries
/// may overlap freely.
pub struct AvailabilityRegistry {
    entries: Vec<Availability>,
}

impl AvailabilityRegistry {
    pub fn new(entries: Vec<Availability>) -> Self {
        Self { entries }
    }

    /// True if at least one entry covers `date`, endpoints included.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.entries.iter().any(|e| e.range().contains(date))
    }

    /// The entry whose terms apply on `date`.
    ///
    /// When several entries cover the same day, the most recently created
    /// one wins (ids break exact timestamp ties), so the lookup is a pure
    /// function of the entry set no matter what order the store returned
    /// the rows in.
    pub fn entry_for(&self, date: NaiveDate) -> Option<&Availability> {
        self.entries
            .iter()
            .filter(|e| e.range().contains(date))
            .max_by_key(|e| (e.created_at, e.id))
    }

    /// The entry containing every day of `range`, if a single one does.
    ///
    /// A range that only exists as the union of two adjacent entries does
    /// not count: a stay runs under one entry's terms. Same tie-break as
    /// [`entry_for`](Self::entry_for) when several entries qualify.
    pub fn covering_entry(&self, range: &posada_shared::DayRange) -> Option<&Availability> {
        self.entries
            .iter()
            .filter(|e| e.range().contains(range.start) && e.range().contains(range.end))
            .max_by_key(|e| (e.created_at, e.id))
    }

    pub fn entries(&self) -> &[Availability] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use posada_shared::{DayRange, StayTerms};
    use uuid::Uuid;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn entry(start: &str, end: &str, created_secs_ago: i64) -> Availability {
        let range = DayRange::new(d(start), d(end)).unwrap();
        let terms = StayTerms {
            accommodation_status: None,
            payment_type: None,
            price_amount: None,
            price_currency: "EUR".to_string(),
            favor_description: None,
        };
        let mut a = Availability::new(Uuid::new_v4(), range, terms, None);
        a.created_at = Utc::now() - Duration::seconds(created_secs_ago);
        a
    }

    #[test]
    fn test_covers_includes_both_endpoints() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", 0)]);

        assert!(registry.covers(d("2025-07-01")));
        assert!(registry.covers(d("2025-07-10")));
        assert!(registry.covers(d("2025-07-04")));
        assert!(!registry.covers(d("2025-06-30")));
        assert!(!registry.covers(d("2025-07-11")));
    }

    #[test]
    fn test_entry_for_uncovered_date_is_none() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", 0)]);
        assert!(registry.entry_for(d("2025-08-01")).is_none());
    }

    #[test]
    fn test_entry_for_prefers_most_recent_on_overlap() {
        let older = entry("2025-07-01", "2025-07-10", 3600);
        let newer = entry("2025-07-05", "2025-07-15", 60);
        let newer_id = newer.id;

        // Same winner regardless of the order the rows arrived in
        let registry = AvailabilityRegistry::new(vec![older.clone(), newer.clone()]);
        assert_eq!(registry.entry_for(d("2025-07-07")).unwrap().id, newer_id);

        let reversed = AvailabilityRegistry::new(vec![newer, older]);
        assert_eq!(reversed.entry_for(d("2025-07-07")).unwrap().id, newer_id);
    }

    #[test]
    fn test_entry_for_breaks_exact_timestamp_ties_by_id() {
        let mut a = entry("2025-07-01", "2025-07-10", 0);
        let mut b = entry("2025-07-01", "2025-07-10", 0);
        let now = Utc::now();
        a.created_at = now;
        b.created_at = now;
        let winner = a.id.max(b.id);

        let registry = AvailabilityRegistry::new(vec![a, b]);
        assert_eq!(registry.entry_for(d("2025-07-05")).unwrap().id, winner);
    }

    #[test]
    fn test_covering_entry_requires_one_entry_for_the_whole_range() {
        let first = entry("2025-07-01", "2025-07-10", 0);
        let first_id = first.id;
        let registry = AvailabilityRegistry::new(vec![first, entry("2025-07-11", "2025-07-20", 0)]);

        let inside = DayRange::new(d("2025-07-03"), d("2025-07-06")).unwrap();
        assert_eq!(registry.covering_entry(&inside).unwrap().id, first_id);

        // Every day is covered, but no single entry holds the whole range
        let spanning = DayRange::new(d("2025-07-08"), d("2025-07-12")).unwrap();
        assert!(registry.covers(d("2025-07-08")));
        assert!(registry.covers(d("2025-07-12")));
        assert!(registry.covering_entry(&spanning).is_none());
    }
}
