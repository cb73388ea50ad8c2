use chrono::{DateTime, NaiveDate, Utc};
use posada_shared::DayRange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Booking status in the lifecycle.
///
/// `pending` is the only state that admits a transition; the other three
/// are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Declined => "declined",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "declined" => Ok(BookingStatus::Declined),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unrecognized booking status: {0}")]
pub struct UnknownStatus(pub String);

/// A guest's request to stay with a host over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub host_id: Uuid,
    pub guest_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(host_id: Uuid, guest_id: Uuid, range: DayRange, message: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            host_id,
            guest_id,
            start_date: range.start,
            end_date: range.end,
            status: BookingStatus::Pending,
            message,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn range(&self) -> DayRange {
        DayRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_booking_starts_pending() {
        let range = DayRange::new("2025-07-03".parse().unwrap(), "2025-07-06".parse().unwrap()).unwrap();
        let booking = Booking::new(Uuid::new_v4(), Uuid::new_v4(), range, "Hi!".to_string());

        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(!booking.status.is_terminal());
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(BookingStatus::Pending.as_str(), "pending");
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!("paused".parse::<BookingStatus>().is_err());

        let json = serde_json::to_string(&BookingStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(BookingStatus::Accepted.is_terminal());
        assert!(BookingStatus::Declined.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
    }
}
