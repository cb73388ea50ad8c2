use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use posada_profile::AccommodationPhoto;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::SessionClaims, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AddPhotoRequest {
    pub photo_url: String,
    pub caption: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/photos", get(list_photos).post(add_photo))
        .route("/v1/photos/{id}", delete(remove_photo))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/photos
/// The caller's photo strip in display order.
async fn list_photos(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<AccommodationPhoto>>, AppError> {
    let photos = state.photo_repo.list_photos(claims.sub).await?;
    Ok(Json(photos))
}

/// POST /v1/photos
/// Append photo metadata at the end of the strip. The file itself lives
/// in external storage; only its URL and caption are kept here.
async fn add_photo(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<AddPhotoRequest>,
) -> Result<Json<AccommodationPhoto>, AppError> {
    let photo_url = req.photo_url.trim().to_string();
    if photo_url.is_empty() {
        return Err(AppError::ValidationError("Photo URL must not be empty".to_string()));
    }

    // Photos hang off a finished profile
    state
        .profile_repo
        .get_profile(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Profile not found".to_string()))?;

    let display_order = state.photo_repo.next_display_order(claims.sub).await?;
    let photo = AccommodationPhoto::new(claims.sub, photo_url, display_order, req.caption);
    state.photo_repo.add_photo(&photo).await?;

    info!("Photo {} added at position {}", photo.id, display_order);
    Ok(Json(photo))
}

/// DELETE /v1/photos/{id}
/// Owner-only removal. Someone else's photo reads as not found.
async fn remove_photo(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.photo_repo.delete_photo(id, claims.sub).await?;
    if !deleted {
        return Err(AppError::NotFoundError("Photo not found".to_string()));
    }

    info!("Photo {} removed", id);
    Ok(StatusCode::NO_CONTENT)
}
