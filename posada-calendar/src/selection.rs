use crate::availability::Availability;
use crate::registry::AvailabilityRegistry;
use chrono::NaiveDate;
use posada_shared::DayRange;
use serde::Serialize;
use uuid::Uuid;

/// Where a guest's two-click date selection currently stands.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum Selection {
    /// Nothing picked yet.
    Empty,
    /// One day picked; waiting for the closing click.
    Anchored {
        start: NaiveDate,
        availability_id: Uuid,
    },
    /// Both ends picked within a single availability entry.
    Completed {
        start: NaiveDate,
        end: NaiveDate,
        availability_id: Uuid,
    },
}

/// Drives the two-click stay selection against one host's calendar.
///
/// Only future days covered by an availability entry are selectable: from
/// an empty selection a click elsewhere changes nothing, and once a day is
/// anchored such a click drops the anchor. Both clicks of a selection must
/// land inside the same availability entry, because the entry's terms
/// apply to the whole stay; a second click on a different entry restarts
/// the selection there instead of completing it. A click after completion
/// always starts over, never extends.
pub struct SelectionResolver<'a> {
    registry: &'a AvailabilityRegistry,
    today: NaiveDate,
    state: Selection,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(registry: &'a AvailabilityRegistry, today: NaiveDate) -> Self {
        Self {
            registry,
            today,
            state: Selection::Empty,
        }
    }

    /// Replay a recorded click sequence and return the resolver's final
    /// position.
    pub fn replay(
        registry: &'a AvailabilityRegistry,
        today: NaiveDate,
        clicks: &[NaiveDate],
    ) -> Self {
        let mut resolver = Self::new(registry, today);
        for &date in clicks {
            resolver.click(date);
        }
        resolver
    }

    pub fn click(&mut self, date: NaiveDate) {
        let entry = if date < self.today {
            None
        } else {
            self.registry.entry_for(date)
        };

        self.state = match (self.state, entry) {
            // Past or uncovered day: an empty selection stays empty, an
            // open anchor or finished range is dropped.
            (_, None) => Selection::Empty,
            (Selection::Empty | Selection::Completed { .. }, Some(e)) => Selection::Anchored {
                start: date,
                availability_id: e.id,
            },
            (
                Selection::Anchored {
                    start,
                    availability_id,
                },
                Some(e),
            ) => {
                if e.id == availability_id {
                    let range = DayRange::from_unordered(start, date);
                    Selection::Completed {
                        start: range.start,
                        end: range.end,
                        availability_id,
                    }
                } else {
                    // The day belongs to a different entry with different
                    // terms, so the anchor moves there.
                    Selection::Anchored {
                        start: date,
                        availability_id: e.id,
                    }
                }
            }
        };
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    /// Calendar highlight check for a rendered day cell.
    pub fn is_selected(&self, date: NaiveDate) -> bool {
        match self.state {
            Selection::Empty => false,
            Selection::Anchored { start, .. } => date == start,
            Selection::Completed { start, end, .. } => start <= date && date <= end,
        }
    }

    /// The chosen stay range, once both clicks have landed.
    pub fn selected_range(&self) -> Option<DayRange> {
        match self.state {
            Selection::Completed { start, end, .. } => Some(DayRange { start, end }),
            _ => None,
        }
    }

    /// The entry whose terms govern the current anchor or completed range.
    pub fn selected_entry(&self) -> Option<&Availability> {
        let id = match self.state {
            Selection::Empty => return None,
            Selection::Anchored {
                availability_id, ..
            } => availability_id,
            Selection::Completed {
                availability_id, ..
            } => availability_id,
        };
        self.registry.entries().iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_shared::{PaymentType, StayTerms};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn entry(start: &str, end: &str, payment_type: Option<PaymentType>) -> Availability {
        let range = DayRange::new(d(start), d(end)).unwrap();
        let terms = StayTerms {
            accommodation_status: None,
            payment_type,
            price_amount: None,
            price_currency: "EUR".to_string(),
            favor_description: None,
        };
        Availability::new(Uuid::new_v4(), range, terms, None)
    }

    #[test]
    fn test_two_clicks_complete_a_range() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", Some(PaymentType::Free))]);
        let mut resolver = SelectionResolver::new(&registry, d("2025-07-01"));

        resolver.click(d("2025-07-03"));
        assert!(matches!(resolver.state(), Selection::Anchored { start, .. } if start == d("2025-07-03")));
        assert!(resolver.is_selected(d("2025-07-03")));
        assert!(!resolver.is_selected(d("2025-07-04")));

        resolver.click(d("2025-07-06"));
        let range = resolver.selected_range().unwrap();
        assert_eq!(range.start, d("2025-07-03"));
        assert_eq!(range.end, d("2025-07-06"));
        assert_eq!(range.nights(), 3);
        assert!(resolver.is_selected(d("2025-07-04")));
        assert!(!resolver.is_selected(d("2025-07-07")));
    }

    #[test]
    fn test_click_order_does_not_matter() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", None)]);

        let forward = SelectionResolver::replay(&registry, d("2025-07-01"), &[d("2025-07-03"), d("2025-07-06")]);
        let backward = SelectionResolver::replay(&registry, d("2025-07-01"), &[d("2025-07-06"), d("2025-07-03")]);

        assert_eq!(forward.selected_range(), backward.selected_range());
    }

    #[test]
    fn test_third_click_restarts_instead_of_extending() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", None)]);
        let mut resolver =
            SelectionResolver::replay(&registry, d("2025-07-01"), &[d("2025-07-03"), d("2025-07-06")]);

        resolver.click(d("2025-07-08"));
        assert!(matches!(resolver.state(), Selection::Anchored { start, .. } if start == d("2025-07-08")));
        assert_eq!(resolver.selected_range(), None);
    }

    #[test]
    fn test_uncovered_click_on_empty_selection_is_ignored() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", None)]);
        let mut resolver = SelectionResolver::new(&registry, d("2025-07-01"));

        resolver.click(d("2025-08-15"));
        assert_eq!(resolver.state(), Selection::Empty);
    }

    #[test]
    fn test_uncovered_click_drops_an_open_anchor() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", None)]);
        let mut resolver = SelectionResolver::new(&registry, d("2025-07-01"));

        resolver.click(d("2025-07-03"));
        assert!(matches!(resolver.state(), Selection::Anchored { .. }));

        resolver.click(d("2025-08-15"));
        assert_eq!(resolver.state(), Selection::Empty);
    }

    #[test]
    fn test_uncovered_click_discards_a_finished_range() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", None)]);
        let mut resolver =
            SelectionResolver::replay(&registry, d("2025-07-01"), &[d("2025-07-03"), d("2025-07-06")]);
        assert!(resolver.selected_range().is_some());

        // Starts a fresh selection, which lands nowhere
        resolver.click(d("2025-08-15"));
        assert_eq!(resolver.state(), Selection::Empty);
        assert_eq!(resolver.selected_range(), None);
    }

    #[test]
    fn test_past_clicks_are_invalid_even_when_covered() {
        let registry = AvailabilityRegistry::new(vec![entry("2025-07-01", "2025-07-10", None)]);
        let mut resolver = SelectionResolver::new(&registry, d("2025-07-05"));

        resolver.click(d("2025-07-02"));
        assert_eq!(resolver.state(), Selection::Empty);

        // A past day inside the anchored entry drops the anchor too
        resolver.click(d("2025-07-06"));
        resolver.click(d("2025-07-02"));
        assert_eq!(resolver.state(), Selection::Empty);
    }

    #[test]
    fn test_second_click_on_other_entry_re_anchors() {
        let july = entry("2025-07-01", "2025-07-10", Some(PaymentType::Free));
        let august = entry("2025-08-01", "2025-08-10", Some(PaymentType::FriendPrice));
        let august_id = august.id;
        let registry = AvailabilityRegistry::new(vec![july, august]);

        let mut resolver = SelectionResolver::new(&registry, d("2025-07-01"));
        resolver.click(d("2025-07-03"));
        resolver.click(d("2025-08-05"));

        match resolver.state() {
            Selection::Anchored {
                start,
                availability_id,
            } => {
                assert_eq!(start, d("2025-08-05"));
                assert_eq!(availability_id, august_id);
            }
            other => panic!("expected re-anchor, got {:?}", other),
        }
    }

    #[test]
    fn test_selected_entry_follows_the_anchor() {
        let e = entry("2025-07-01", "2025-07-10", Some(PaymentType::Free));
        let id = e.id;
        let registry = AvailabilityRegistry::new(vec![e]);

        let mut resolver = SelectionResolver::new(&registry, d("2025-07-01"));
        assert!(resolver.selected_entry().is_none());

        resolver.click(d("2025-07-03"));
        assert_eq!(resolver.selected_entry().unwrap().id, id);
    }
}
