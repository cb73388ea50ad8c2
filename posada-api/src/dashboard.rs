use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use posada_calendar::Availability;
use posada_profile::{Completeness, Profile};
use serde::Serialize;

use crate::bookings::{RequestItem, TripItem};
use crate::{error::AppError, middleware::auth::SessionClaims, state::AppState};

#[derive(Debug, Serialize)]
struct DashboardResponse {
    profile: Profile,
    completeness: Completeness,
    availabilities: Vec<Availability>,
    requests: Vec<RequestItem>,
    trips: Vec<TripItem>,
    pending_requests: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/dashboard", get(get_dashboard))
}

/// GET /v1/dashboard
/// Everything the landing screen needs in one round trip: profile,
/// completeness score, upcoming calendar, both booking lists and the
/// open-request count behind the notification badge.
async fn get_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<DashboardResponse>, AppError> {
    let profile = state
        .profile_repo
        .get_profile(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Profile not found".to_string()))?;

    let today = Utc::now().date_naive();
    let availabilities = state
        .availability_repo
        .list_availabilities(claims.sub, Some(today))
        .await?;
    let photos = state.photo_repo.list_photos(claims.sub).await?;

    let host_bookings = state.booking_repo.list_bookings_for_host(claims.sub).await?;
    let mut requests = Vec::with_capacity(host_bookings.len());
    for booking in host_bookings {
        let guest = state.profile_repo.get_profile(booking.guest_id).await?;
        requests.push(RequestItem { booking, guest });
    }

    let guest_bookings = state.booking_repo.list_bookings_for_guest(claims.sub).await?;
    let mut trips = Vec::with_capacity(guest_bookings.len());
    for booking in guest_bookings {
        let host = state.profile_repo.get_profile(booking.host_id).await?;
        trips.push(TripItem { booking, host });
    }

    let pending_requests = state.booking_repo.count_pending_for_host(claims.sub).await?;
    let completeness = Completeness::evaluate(&profile, photos.len(), availabilities.len());

    Ok(Json(DashboardResponse {
        profile,
        completeness,
        availabilities,
        requests,
        trips,
        pending_requests,
    }))
}
