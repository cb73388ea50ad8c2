pub mod completeness;
pub mod models;
pub mod onboarding;
pub mod username;

pub use completeness::Completeness;
pub use models::{AccommodationPhoto, Profile, ProfileChanges, ProfileError};
pub use onboarding::{DraftError, DraftUpdate, OnboardingDraft};
pub use username::{validate_username, UsernameError};
