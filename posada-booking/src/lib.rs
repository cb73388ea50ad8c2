pub mod lifecycle;
pub mod models;

pub use lifecycle::{BookingError, BookingLifecycle, Decision};
pub use models::{Booking, BookingStatus};
