//! In-memory implementations of the store traits. They back the API
//! integration tests and the demo mode, so the server can run without
//! Postgres or Redis.

use async_trait::async_trait;
use chrono::NaiveDate;
use posada_booking::{Booking, BookingStatus};
use posada_calendar::Availability;
use posada_core::repository::{
    AvailabilityRepository, BookingRepository, DraftStore, PhotoRepository, ProfileRepository,
    RateLimiter,
};
use posada_core::CoreError;
use posada_profile::{AccommodationPhoto, OnboardingDraft, Profile, ProfileChanges};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryProfileRepository {
    profiles: Mutex<HashMap<Uuid, Profile>>,
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn create_profile(
        &self,
        profile: &Profile,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut profiles = self.profiles.lock().await;
        if profiles.contains_key(&profile.id)
            || profiles.values().any(|p| p.username == profile.username)
        {
            return Err(Box::new(CoreError::Conflict(format!(
                "Profile for username {} already exists",
                profile.username
            ))));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn get_profile(
        &self,
        id: Uuid,
    ) -> Result<Option<Profile>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.profiles.lock().await.get(&id).cloned())
    }

    async fn get_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Profile>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .profiles
            .lock()
            .await
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn username_taken(
        &self,
        username: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .profiles
            .lock()
            .await
            .values()
            .any(|p| p.username == username))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, Box<dyn std::error::Error + Send + Sync>> {
        let mut profiles = self.profiles.lock().await;
        match profiles.get_mut(&id) {
            Some(profile) => {
                profile.apply(changes.clone());
                Ok(Some(profile.clone()))
            }
            None => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct MemoryAvailabilityRepository {
    entries: Mutex<Vec<Availability>>,
}

#[async_trait]
impl AvailabilityRepository for MemoryAvailabilityRepository {
    async fn create_availability(
        &self,
        availability: &Availability,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.entries.lock().await.push(availability.clone());
        Ok(availability.id)
    }

    async fn get_availability(
        &self,
        id: Uuid,
    ) -> Result<Option<Availability>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list_availabilities(
        &self,
        host_id: Uuid,
        min_end_date: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries: Vec<Availability> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|e| e.user_id == host_id)
            .filter(|e| min_end_date.map_or(true, |min| e.end_date >= min))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.start_date);
        Ok(entries)
    }

    async fn delete_availability(
        &self,
        id: Uuid,
        host_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.user_id == host_id));
        Ok(entries.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn create_booking(
        &self,
        booking: &Booking,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.bookings.lock().await.push(booking.clone());
        Ok(booking.id)
    }

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .bookings
            .lock()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn list_bookings_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .iter()
            .filter(|b| b.host_id == host_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn list_bookings_for_guest(
        &self,
        guest_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .iter()
            .filter(|b| b.guest_id == guest_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings = self.bookings.lock().await;
        if let Some(booking) = bookings.iter_mut().find(|b| b.id == id) {
            booking.update_status(status);
        }
        Ok(())
    }

    async fn count_pending_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .bookings
            .lock()
            .await
            .iter()
            .filter(|b| b.host_id == host_id && b.status == BookingStatus::Pending)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryPhotoRepository {
    photos: Mutex<Vec<AccommodationPhoto>>,
}

#[async_trait]
impl PhotoRepository for MemoryPhotoRepository {
    async fn add_photo(
        &self,
        photo: &AccommodationPhoto,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.photos.lock().await.push(photo.clone());
        Ok(photo.id)
    }

    async fn list_photos(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<AccommodationPhoto>, Box<dyn std::error::Error + Send + Sync>> {
        let mut photos: Vec<AccommodationPhoto> = self
            .photos
            .lock()
            .await
            .iter()
            .filter(|p| p.user_id == profile_id)
            .cloned()
            .collect();
        photos.sort_by_key(|p| p.display_order);
        Ok(photos)
    }

    async fn delete_photo(
        &self,
        id: Uuid,
        profile_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut photos = self.photos.lock().await;
        let before = photos.len();
        photos.retain(|p| !(p.id == id && p.user_id == profile_id));
        Ok(photos.len() < before)
    }

    async fn next_display_order(
        &self,
        profile_id: Uuid,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .photos
            .lock()
            .await
            .iter()
            .filter(|p| p.user_id == profile_id)
            .map(|p| p.display_order + 1)
            .max()
            .unwrap_or(0))
    }
}

/// TTL bookkeeping mirrors the Redis store: a draft older than the TTL is
/// gone, it just gets swept lazily on the next read.
pub struct MemoryDraftStore {
    drafts: Mutex<HashMap<Uuid, (OnboardingDraft, Instant)>>,
    ttl: Duration,
}

impl MemoryDraftStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn put_draft(
        &self,
        draft: &OnboardingDraft,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.drafts
            .lock()
            .await
            .insert(draft.draft_id, (draft.clone(), Instant::now()));
        Ok(())
    }

    async fn get_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<Option<OnboardingDraft>, Box<dyn std::error::Error + Send + Sync>> {
        let mut drafts = self.drafts.lock().await;
        match drafts.get(&draft_id) {
            Some((draft, stored_at)) => {
                if stored_at.elapsed() >= self.ttl {
                    drafts.remove(&draft_id);
                    Ok(None)
                } else {
                    Ok(Some(draft.clone()))
                }
            }
            None => Ok(None),
        }
    }

    async fn delete_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.drafts.lock().await.remove(&draft_id);
        Ok(())
    }
}

/// Fixed-window counter, one window per key.
#[derive(Default)]
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, (u32, Instant)>>,
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut windows = self.windows.lock().await;
        let window = Duration::from_secs(window_secs);
        let entry = windows.entry(key.to_string()).or_insert((0, Instant::now()));
        if entry.1.elapsed() >= window {
            *entry = (0, Instant::now());
        }
        entry.0 += 1;
        Ok(entry.0 <= max_requests)
    }
}
