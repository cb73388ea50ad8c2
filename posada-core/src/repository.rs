use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Repository trait for profile data access
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create_profile(
        &self,
        profile: &posada_profile::Profile,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get_profile(
        &self,
        id: Uuid,
    ) -> Result<Option<posada_profile::Profile>, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<posada_profile::Profile>, Box<dyn std::error::Error + Send + Sync>>;

    async fn username_taken(
        &self,
        username: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &posada_profile::ProfileChanges,
    ) -> Result<Option<posada_profile::Profile>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for availability entry access
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create_availability(
        &self,
        availability: &posada_calendar::Availability,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_availability(
        &self,
        id: Uuid,
    ) -> Result<Option<posada_calendar::Availability>, Box<dyn std::error::Error + Send + Sync>>;

    /// Entries for one host ordered by start date, optionally dropping
    /// those that ended before `min_end_date`.
    async fn list_availabilities(
        &self,
        host_id: Uuid,
        min_end_date: Option<NaiveDate>,
    ) -> Result<Vec<posada_calendar::Availability>, Box<dyn std::error::Error + Send + Sync>>;

    /// Owner-scoped delete; returns false when no row matched.
    async fn delete_availability(
        &self,
        id: Uuid,
        host_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(
        &self,
        booking: &posada_booking::Booking,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<posada_booking::Booking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_bookings_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<posada_booking::Booking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_bookings_for_guest(
        &self,
        guest_id: Uuid,
    ) -> Result<Vec<posada_booking::Booking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: posada_booking::BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Open request count backing the host's unread indicator.
    async fn count_pending_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for accommodation photo access
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn add_photo(
        &self,
        photo: &posada_profile::AccommodationPhoto,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_photos(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<posada_profile::AccommodationPhoto>, Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_photo(
        &self,
        id: Uuid,
        profile_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Next free slot at the end of the owner's photo strip.
    async fn next_display_order(
        &self,
        profile_id: Uuid,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>>;
}

/// Store trait for in-progress onboarding drafts. Drafts expire on their
/// own; a finalized draft is deleted explicitly.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn put_draft(
        &self,
        draft: &posada_profile::OnboardingDraft,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<Option<posada_profile::OnboardingDraft>, Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Fixed-window request counter keyed by caller identity.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Returns true when the caller is still within the window's budget.
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
