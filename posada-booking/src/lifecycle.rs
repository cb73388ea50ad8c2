use crate::models::{Booking, BookingStatus};
use chrono::NaiveDate;
use posada_calendar::AvailabilityRegistry;
use posada_shared::DayRange;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Answer a host can give to a pending request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Declined,
}

impl Decision {
    pub fn as_status(&self) -> BookingStatus {
        match self {
            Decision::Accepted => BookingStatus::Accepted,
            Decision::Declined => BookingStatus::Declined,
        }
    }
}

/// Validates booking state transitions and request preconditions.
///
/// Every transition is checked here rather than trusted from the client;
/// a violation leaves the booking untouched and surfaces as an error. The
/// lifecycle itself holds no bookings, so the same rules run against rows
/// loaded from any store.
pub struct BookingLifecycle {
    auto_decline_overlaps: bool,
}

impl BookingLifecycle {
    pub fn new(auto_decline_overlaps: bool) -> Self {
        Self {
            auto_decline_overlaps,
        }
    }

    /// Preconditions for a new stay request.
    ///
    /// The requested range is re-resolved against the host's current
    /// entries: the whole stay must sit inside one availability entry, no
    /// matter what the guest's calendar showed when they clicked.
    pub fn validate_request(
        &self,
        host_id: Uuid,
        guest_id: Uuid,
        range: &DayRange,
        today: NaiveDate,
        registry: &AvailabilityRegistry,
    ) -> Result<(), BookingError> {
        if guest_id == host_id {
            return Err(BookingError::SelfRequest);
        }
        if range.start < today {
            return Err(BookingError::StartsInPast(range.start));
        }
        if registry.covering_entry(range).is_none() {
            return Err(BookingError::NotCovered);
        }
        Ok(())
    }

    /// Host accepts or declines. Only `pending` requests can be answered,
    /// and only by the booked host.
    pub fn respond(
        &self,
        booking: &Booking,
        caller: Uuid,
        decision: Decision,
    ) -> Result<BookingStatus, BookingError> {
        if caller != booking.host_id {
            return Err(BookingError::NotHost);
        }
        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidTransition {
                from: booking.status.as_str().to_string(),
                to: decision.as_status().as_str().to_string(),
            });
        }
        Ok(decision.as_status())
    }

    /// Guest withdraws a request that the host has not answered yet.
    pub fn cancel(&self, booking: &Booking, caller: Uuid) -> Result<BookingStatus, BookingError> {
        if caller != booking.guest_id {
            return Err(BookingError::NotGuest);
        }
        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidTransition {
                from: booking.status.as_str().to_string(),
                to: BookingStatus::Cancelled.as_str().to_string(),
            });
        }
        Ok(BookingStatus::Cancelled)
    }

    /// The same host's other pending requests that collide with a booking
    /// that was just accepted. These get declined in the same round trip
    /// when the auto-decline rule is on; with the rule off the host keeps
    /// curating by hand and this returns nothing.
    pub fn overlapping_pending(&self, accepted: &Booking, candidates: &[Booking]) -> Vec<Uuid> {
        if !self.auto_decline_overlaps {
            return Vec::new();
        }
        candidates
            .iter()
            .filter(|b| {
                b.id != accepted.id
                    && b.host_id == accepted.host_id
                    && b.status == BookingStatus::Pending
                    && b.range().overlaps(&accepted.range())
            })
            .map(|b| b.id)
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("You cannot request a stay at your own place")]
    SelfRequest,

    #[error("Stay cannot start in the past ({0})")]
    StartsInPast(NaiveDate),

    #[error("Requested dates are not covered by a single availability entry")]
    NotCovered,

    #[error("Only the host can respond to a request")]
    NotHost,

    #[error("Only the guest can cancel a request")]
    NotGuest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_calendar::Availability;
    use posada_shared::StayTerms;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> DayRange {
        DayRange::new(d(start), d(end)).unwrap()
    }

    fn entry(user_id: Uuid, start: &str, end: &str) -> Availability {
        let terms = StayTerms {
            accommodation_status: None,
            payment_type: None,
            price_amount: None,
            price_currency: "EUR".to_string(),
            favor_description: None,
        };
        Availability::new(user_id, range(start, end), terms, None)
    }

    #[test]
    fn test_booking_lifecycle_accept() {
        let lifecycle = BookingLifecycle::new(true);
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let registry = AvailabilityRegistry::new(vec![entry(host, "2025-07-01", "2025-07-10")]);

        // Guest picked Jul 3 and Jul 6 on a free July entry
        let stay = range("2025-07-03", "2025-07-06");
        lifecycle
            .validate_request(host, guest, &stay, d("2025-07-01"), &registry)
            .unwrap();

        let mut booking = Booking::new(host, guest, stay, "See you soon!".to_string());
        assert_eq!(booking.status, BookingStatus::Pending);

        let new_status = lifecycle.respond(&booking, host, Decision::Accepted).unwrap();
        booking.update_status(new_status);
        assert_eq!(booking.status, BookingStatus::Accepted);
    }

    #[test]
    fn test_second_response_is_rejected() {
        let lifecycle = BookingLifecycle::new(true);
        let host = Uuid::new_v4();
        let mut booking = Booking::new(host, Uuid::new_v4(), range("2025-07-03", "2025-07-06"), String::new());

        let accepted = lifecycle.respond(&booking, host, Decision::Accepted).unwrap();
        booking.update_status(accepted);

        // Accepted is terminal, so a decline afterwards must fail
        let second = lifecycle.respond(&booking, host, Decision::Declined);
        assert!(matches!(
            second,
            Err(BookingError::InvalidTransition { ref from, ref to }) if from == "accepted" && to == "declined"
        ));
        assert_eq!(booking.status, BookingStatus::Accepted);
    }

    #[test]
    fn test_only_the_host_responds() {
        let lifecycle = BookingLifecycle::new(true);
        let guest = Uuid::new_v4();
        let booking = Booking::new(Uuid::new_v4(), guest, range("2025-07-03", "2025-07-06"), String::new());

        let result = lifecycle.respond(&booking, guest, Decision::Accepted);
        assert!(matches!(result, Err(BookingError::NotHost)));
    }

    #[test]
    fn test_cancel_is_guest_only_and_pending_only() {
        let lifecycle = BookingLifecycle::new(true);
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let mut booking = Booking::new(host, guest, range("2025-07-03", "2025-07-06"), String::new());

        assert!(matches!(
            lifecycle.cancel(&booking, host),
            Err(BookingError::NotGuest)
        ));

        let cancelled = lifecycle.cancel(&booking, guest).unwrap();
        booking.update_status(cancelled);
        assert_eq!(booking.status, BookingStatus::Cancelled);

        // Cancelled is terminal
        assert!(matches!(
            lifecycle.cancel(&booking, guest),
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_request_preconditions() {
        let lifecycle = BookingLifecycle::new(true);
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let registry = AvailabilityRegistry::new(vec![
            entry(host, "2025-07-01", "2025-07-10"),
            entry(host, "2025-07-11", "2025-07-20"),
        ]);
        let today = d("2025-07-01");

        // Hosts cannot book themselves
        assert!(matches!(
            lifecycle.validate_request(host, host, &range("2025-07-03", "2025-07-06"), today, &registry),
            Err(BookingError::SelfRequest)
        ));

        // Starting in the past is rejected, starting today is fine
        assert!(matches!(
            lifecycle.validate_request(host, guest, &range("2025-06-28", "2025-07-02"), today, &registry),
            Err(BookingError::StartsInPast(_))
        ));
        assert!(lifecycle
            .validate_request(host, guest, &range("2025-07-01", "2025-07-04"), today, &registry)
            .is_ok());

        // Spanning two adjacent entries is not a valid stay
        assert!(matches!(
            lifecycle.validate_request(host, guest, &range("2025-07-08", "2025-07-12"), today, &registry),
            Err(BookingError::NotCovered)
        ));

        // Entirely outside the calendar
        assert!(matches!(
            lifecycle.validate_request(host, guest, &range("2025-09-01", "2025-09-05"), today, &registry),
            Err(BookingError::NotCovered)
        ));
    }

    #[test]
    fn test_accept_collects_overlapping_pending_requests() {
        let lifecycle = BookingLifecycle::new(true);
        let host = Uuid::new_v4();

        let mut accepted = Booking::new(host, Uuid::new_v4(), range("2025-07-03", "2025-07-06"), String::new());
        accepted.update_status(BookingStatus::Accepted);

        let colliding = Booking::new(host, Uuid::new_v4(), range("2025-07-05", "2025-07-08"), String::new());
        let disjoint = Booking::new(host, Uuid::new_v4(), range("2025-07-10", "2025-07-12"), String::new());
        let mut already_accepted = Booking::new(host, Uuid::new_v4(), range("2025-07-04", "2025-07-05"), String::new());
        already_accepted.update_status(BookingStatus::Accepted);
        let other_host = Booking::new(Uuid::new_v4(), Uuid::new_v4(), range("2025-07-05", "2025-07-08"), String::new());

        let candidates = vec![
            accepted.clone(),
            colliding.clone(),
            disjoint,
            already_accepted,
            other_host,
        ];
        let to_decline = lifecycle.overlapping_pending(&accepted, &candidates);

        // Only the same host's colliding pending request gets swept up
        assert_eq!(to_decline, vec![colliding.id]);
    }

    #[test]
    fn test_auto_decline_can_be_switched_off() {
        let lifecycle = BookingLifecycle::new(false);
        let host = Uuid::new_v4();

        let mut accepted = Booking::new(host, Uuid::new_v4(), range("2025-07-03", "2025-07-06"), String::new());
        accepted.update_status(BookingStatus::Accepted);
        let colliding = Booking::new(host, Uuid::new_v4(), range("2025-07-05", "2025-07-08"), String::new());

        let to_decline = lifecycle.overlapping_pending(&accepted, &[accepted.clone(), colliding]);
        assert!(to_decline.is_empty());
    }
}
