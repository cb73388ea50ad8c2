use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::Utc;
use posada_calendar::Availability;
use posada_profile::{AccommodationPhoto, Profile, ProfileChanges};
use serde::Serialize;
use tracing::info;

use crate::{error::AppError, middleware::auth::SessionClaims, state::AppState};

#[derive(Debug, Serialize)]
struct PublicProfileResponse {
    profile: Profile,
    availabilities: Vec<Availability>,
    photos: Vec<AccommodationPhoto>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/profiles/{username}", get(get_public_profile))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/v1/profiles/me", patch(update_own_profile))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/profiles/{username}
/// The public page: profile, upcoming calendar and photos in one response.
async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let username = username.trim().to_lowercase();
    let profile = state
        .profile_repo
        .get_profile_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Profile not found".to_string()))?;

    let today = Utc::now().date_naive();
    let availabilities = state
        .availability_repo
        .list_availabilities(profile.id, Some(today))
        .await?;
    let photos = state.photo_repo.list_photos(profile.id).await?;

    Ok(Json(PublicProfileResponse {
        profile,
        availabilities,
        photos,
    }))
}

/// PATCH /v1/profiles/me
/// Owner edits. The username is fixed at finalize and stays fixed.
async fn update_own_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<Profile>, AppError> {
    changes.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;

    let profile = state
        .profile_repo
        .update_profile(claims.sub, &changes)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Profile not found".to_string()))?;

    info!("Profile {} updated", claims.sub);
    Ok(Json(profile))
}
