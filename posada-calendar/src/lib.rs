pub mod availability;
pub mod registry;
pub mod selection;

pub use availability::{Availability, AvailabilityError};
pub use registry::AvailabilityRegistry;
pub use selection::{Selection, SelectionResolver};
