use chrono::{DateTime, NaiveDate, Utc};
use posada_shared::{DayRange, PaymentType, StayTerms};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published block of dates a host is open to receiving guests.
///
/// Entries are immutable once published; the owner deletes and re-creates
/// instead of editing. Overlapping entries for the same host are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub accommodation_status: Option<posada_shared::AccommodationStatus>,
    pub payment_type: Option<PaymentType>,
    pub price_amount: Option<i32>,
    pub price_currency: String,
    pub favor_description: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Availability {
    /// Build a new entry, normalizing terms the same way the publish form
    /// does: price only survives for friend-price entries, favor text only
    /// for favor/service entries.
    pub fn new(user_id: Uuid, range: DayRange, terms: StayTerms, notes: Option<String>) -> Self {
        let price_amount = match terms.payment_type {
            Some(PaymentType::FriendPrice) => terms.price_amount,
            _ => None,
        };
        let favor_description = match terms.payment_type {
            Some(PaymentType::Favor) | Some(PaymentType::Service) => terms.favor_description,
            _ => None,
        };

        Self {
            id: Uuid::new_v4(),
            user_id,
            start_date: range.start,
            end_date: range.end,
            accommodation_status: terms.accommodation_status,
            payment_type: terms.payment_type,
            price_amount,
            price_currency: terms.price_currency,
            favor_description,
            notes,
            created_at: Utc::now(),
        }
    }

    pub fn range(&self) -> DayRange {
        DayRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn terms(&self) -> StayTerms {
        StayTerms {
            accommodation_status: self.accommodation_status,
            payment_type: self.payment_type,
            price_amount: self.price_amount,
            price_currency: self.price_currency.clone(),
            favor_description: self.favor_description.clone(),
        }
    }

    /// Shape checks applied before an entry is persisted.
    pub fn validate(&self) -> Result<(), AvailabilityError> {
        if self.start_date > self.end_date {
            return Err(AvailabilityError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }

        if self.payment_type == Some(PaymentType::FriendPrice) {
            match self.price_amount {
                Some(amount) if amount > 0 => {}
                _ => return Err(AvailabilityError::MissingPrice),
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("Friend-price entries need a positive nightly price")]
    MissingPrice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_shared::AccommodationStatus;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn terms(payment_type: Option<PaymentType>, price: Option<i32>) -> StayTerms {
        StayTerms {
            accommodation_status: Some(AccommodationStatus::Empty),
            payment_type,
            price_amount: price,
            price_currency: "EUR".to_string(),
            favor_description: Some("water my plants".to_string()),
        }
    }

    #[test]
    fn test_new_normalizes_terms_by_payment_type() {
        let range = DayRange::new(d("2025-07-01"), d("2025-07-10")).unwrap();

        // Free entries drop both the price and the favor text
        let free = Availability::new(Uuid::new_v4(), range, terms(Some(PaymentType::Free), Some(20)), None);
        assert_eq!(free.price_amount, None);
        assert_eq!(free.favor_description, None);

        // Friend price keeps the price, drops the favor text
        let priced = Availability::new(Uuid::new_v4(), range, terms(Some(PaymentType::FriendPrice), Some(20)), None);
        assert_eq!(priced.price_amount, Some(20));
        assert_eq!(priced.favor_description, None);

        // Favor keeps the favor text, drops the price
        let favor = Availability::new(Uuid::new_v4(), range, terms(Some(PaymentType::Favor), Some(20)), None);
        assert_eq!(favor.price_amount, None);
        assert_eq!(favor.favor_description.as_deref(), Some("water my plants"));
    }

    #[test]
    fn test_validate_friend_price_needs_amount() {
        let range = DayRange::new(d("2025-07-01"), d("2025-07-10")).unwrap();

        let missing = Availability::new(Uuid::new_v4(), range, terms(Some(PaymentType::FriendPrice), None), None);
        assert!(matches!(missing.validate(), Err(AvailabilityError::MissingPrice)));

        let zero = Availability::new(Uuid::new_v4(), range, terms(Some(PaymentType::FriendPrice), Some(0)), None);
        assert!(matches!(zero.validate(), Err(AvailabilityError::MissingPrice)));

        let ok = Availability::new(Uuid::new_v4(), range, terms(Some(PaymentType::FriendPrice), Some(15)), None);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let range = DayRange::new(d("2025-07-01"), d("2025-07-10")).unwrap();
        let mut entry = Availability::new(Uuid::new_v4(), range, terms(None, None), None);
        entry.start_date = d("2025-07-20");

        assert!(matches!(entry.validate(), Err(AvailabilityError::InvertedRange { .. })));
    }
}
