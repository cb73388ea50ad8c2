use std::sync::Arc;

use posada_core::repository::{
    AvailabilityRepository, BookingRepository, DraftStore, PhotoRepository, ProfileRepository,
    RateLimiter,
};
use posada_store::app_config::HouseRules;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub photo_repo: Arc<dyn PhotoRepository>,
    pub draft_store: Arc<dyn DraftStore>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub auth: AuthConfig,
    pub rules: HouseRules,
}
