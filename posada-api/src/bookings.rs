use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use posada_booking::{Booking, BookingError, BookingLifecycle, BookingStatus, Decision};
use posada_calendar::{AvailabilityRegistry, Selection, SelectionResolver};
use posada_profile::Profile;
use posada_shared::{DayRange, StayTerms};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::SessionClaims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub host_username: String,
    #[serde(default)]
    pub clicks: Vec<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub selection: Selection,
    pub range: Option<DayRange>,
    pub nights: Option<i64>,
    pub terms: Option<StayTerms>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub host_username: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub decision: Decision,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub booking: Booking,
    pub auto_declined: Vec<Uuid>,
}

/// A host-side request with the guest attached.
#[derive(Debug, Serialize)]
pub struct RequestItem {
    #[serde(flatten)]
    pub booking: Booking,
    pub guest: Option<Profile>,
}

/// A guest-side trip with the host attached.
#[derive(Debug, Serialize)]
pub struct TripItem {
    #[serde(flatten)]
    pub booking: Booking,
    pub host: Option<Profile>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings/preview", post(preview_selection))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/requests", get(list_requests))
        .route("/v1/bookings/trips", get(list_trips))
        .route("/v1/bookings/{id}/respond", post(respond_to_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

fn booking_error(err: BookingError) -> AppError {
    match err {
        BookingError::NotHost | BookingError::NotGuest => AppError::AuthorizationError(err.to_string()),
        BookingError::InvalidTransition { .. } => AppError::ConflictError(err.to_string()),
        _ => AppError::ValidationError(err.to_string()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/bookings/preview
/// Replay a click sequence against a host's calendar and report where the
/// selection stands, with the owning entry's terms once it completes.
async fn preview_selection(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let username = req.host_username.trim().to_lowercase();
    let host = state
        .profile_repo
        .get_profile_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Host not found".to_string()))?;

    let today = Utc::now().date_naive();
    let entries = state
        .availability_repo
        .list_availabilities(host.id, Some(today))
        .await?;
    let registry = AvailabilityRegistry::new(entries);

    let resolver = SelectionResolver::replay(&registry, today, &req.clicks);
    let range = resolver.selected_range();
    let terms = resolver.selected_entry().map(|e| e.terms());

    Ok(Json(PreviewResponse {
        selection: resolver.state(),
        nights: range.map(|r| r.nights()),
        range,
        terms,
    }))
}

/// POST /v1/bookings
/// A guest asks to stay. The range is re-resolved against the host's
/// current calendar, so a stale client cannot request uncovered dates.
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    // Requests come from finished profiles only
    state
        .profile_repo
        .get_profile(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Profile not found".to_string()))?;

    let username = req.host_username.trim().to_lowercase();
    let host = state
        .profile_repo
        .get_profile_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Host not found".to_string()))?;

    let range = DayRange::new(req.start_date, req.end_date)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    // 1. Re-resolve the range against the host's current calendar
    let today = Utc::now().date_naive();
    let entries = state
        .availability_repo
        .list_availabilities(host.id, Some(today))
        .await?;
    let registry = AvailabilityRegistry::new(entries);

    let lifecycle = BookingLifecycle::new(state.rules.auto_decline_overlaps);
    lifecycle
        .validate_request(host.id, claims.sub, &range, today, &registry)
        .map_err(booking_error)?;

    // 2. Persist the pending request
    let booking = Booking::new(host.id, claims.sub, range, req.message.unwrap_or_default());
    state.booking_repo.create_booking(&booking).await?;

    info!("Stay request {} created for host {}", booking.id, host.id);
    Ok(Json(booking))
}

/// GET /v1/bookings/requests
/// Bookings where the caller hosts, newest first, with guest profiles.
async fn list_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<RequestItem>>, AppError> {
    let bookings = state.booking_repo.list_bookings_for_host(claims.sub).await?;

    let mut items = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let guest = state.profile_repo.get_profile(booking.guest_id).await?;
        items.push(RequestItem { booking, guest });
    }

    Ok(Json(items))
}

/// GET /v1/bookings/trips
/// Bookings where the caller travels, newest first, with host profiles.
async fn list_trips(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<TripItem>>, AppError> {
    let bookings = state.booking_repo.list_bookings_for_guest(claims.sub).await?;

    let mut items = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let host = state.profile_repo.get_profile(booking.host_id).await?;
        items.push(TripItem { booking, host });
    }

    Ok(Json(items))
}

/// POST /v1/bookings/{id}/respond
/// Host accepts or declines. Accepting also declines the host's other
/// pending requests that overlap the stay, in the same round trip.
async fn respond_to_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<RespondResponse>, AppError> {
    let mut booking = state
        .booking_repo
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

    let lifecycle = BookingLifecycle::new(state.rules.auto_decline_overlaps);
    let new_status = lifecycle
        .respond(&booking, claims.sub, req.decision)
        .map_err(booking_error)?;

    state.booking_repo.update_booking_status(booking_id, new_status).await?;
    booking.update_status(new_status);

    let mut auto_declined = Vec::new();
    if new_status == BookingStatus::Accepted {
        let candidates = state.booking_repo.list_bookings_for_host(claims.sub).await?;
        auto_declined = lifecycle.overlapping_pending(&booking, &candidates);
        for other in &auto_declined {
            state
                .booking_repo
                .update_booking_status(*other, BookingStatus::Declined)
                .await?;
            info!("Request {} auto-declined by acceptance of {}", other, booking_id);
        }
    }

    info!("Request {} {}", booking_id, new_status.as_str());
    Ok(Json(RespondResponse {
        booking,
        auto_declined,
    }))
}

/// POST /v1/bookings/{id}/cancel
/// Guest withdraws a still-pending request.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let mut booking = state
        .booking_repo
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

    let lifecycle = BookingLifecycle::new(state.rules.auto_decline_overlaps);
    let new_status = lifecycle.cancel(&booking, claims.sub).map_err(booking_error)?;

    state.booking_repo.update_booking_status(booking_id, new_status).await?;
    booking.update_status(new_status);

    info!("Request {} cancelled by guest", booking_id);
    Ok(Json(booking))
}
