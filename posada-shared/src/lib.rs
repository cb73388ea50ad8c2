pub mod dates;
pub mod terms;

pub use dates::{DayRange, RangeError};
pub use terms::{AccommodationStatus, AccommodationType, Intent, PaymentType, Presence, StayTerms};
