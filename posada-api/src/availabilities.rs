use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use posada_calendar::Availability;
use posada_shared::{AccommodationStatus, DayRange, PaymentType, StayTerms};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::SessionClaims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub min_end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub accommodation_status: Option<AccommodationStatus>,
    pub payment_type: Option<PaymentType>,
    pub price_amount: Option<i32>,
    pub price_currency: Option<String>,
    pub favor_description: Option<String>,
    pub notes: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/availabilities", get(list_availabilities).post(publish_availability))
        .route("/v1/availabilities/{id}", delete(remove_availability))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/availabilities
/// The caller's own entries, oldest start first. `?min_end_date=` trims
/// entries that already ended.
async fn list_availabilities(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Availability>>, AppError> {
    let entries = state
        .availability_repo
        .list_availabilities(claims.sub, params.min_end_date)
        .await?;

    Ok(Json(entries))
}

/// POST /v1/availabilities
/// Publish a date range. Terms left out of the request fall back to the
/// publisher's profile defaults, field by field.
async fn publish_availability(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<Availability>, AppError> {
    // 1. Defaults come from the publisher's profile
    let profile = state
        .profile_repo
        .get_profile(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Profile not found".to_string()))?;

    let range = DayRange::new(req.start_date, req.end_date)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    // 2. Explicit terms win over the defaults
    let defaults = profile.default_stay_terms(&state.rules.default_currency);
    let terms = StayTerms {
        accommodation_status: req.accommodation_status.or(defaults.accommodation_status),
        payment_type: req.payment_type.or(defaults.payment_type),
        price_amount: req.price_amount.or(defaults.price_amount),
        price_currency: req.price_currency.unwrap_or(defaults.price_currency),
        favor_description: req.favor_description.or(defaults.favor_description),
    };

    let availability = Availability::new(claims.sub, range, terms, req.notes);
    availability.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;

    state.availability_repo.create_availability(&availability).await?;

    info!(
        "Availability {} published for {} to {}",
        availability.id, availability.start_date, availability.end_date
    );
    Ok(Json(availability))
}

/// DELETE /v1/availabilities/{id}
/// Owner-only removal. Someone else's entry reads as not found.
async fn remove_availability(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.availability_repo.delete_availability(id, claims.sub).await?;
    if !deleted {
        return Err(AppError::NotFoundError("Availability not found".to_string()));
    }

    info!("Availability {} removed", id);
    Ok(StatusCode::NO_CONTENT)
}
