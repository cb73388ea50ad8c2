use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use posada_core::CoreError;
use posada_profile::{DraftUpdate, OnboardingDraft, Profile};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::SessionClaims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateDraftRequest {
    pub referral_username: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateDraftResponse {
    draft_id: Uuid,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct FinalizeResponse {
    profile: Profile,
    created: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/onboarding/drafts", post(create_draft))
        .route("/v1/onboarding/drafts/{id}", get(load_draft).put(save_draft))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/v1/onboarding/drafts/{id}/finalize", post(finalize_draft))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/onboarding/drafts
/// Start a wizard draft. Runs before sign-in, so the draft id lives on the
/// client until finalize ties it to an account.
async fn create_draft(
    State(state): State<AppState>,
    body: Option<Json<CreateDraftRequest>>,
) -> Result<Json<CreateDraftResponse>, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let referral = req
        .referral_username
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty());

    let draft = OnboardingDraft::new(referral);
    state.draft_store.put_draft(&draft).await?;

    let expires_at = Utc::now() + Duration::seconds(state.rules.draft_ttl_seconds as i64);
    Ok(Json(CreateDraftResponse {
        draft_id: draft.draft_id,
        expires_at,
    }))
}

/// GET /v1/onboarding/drafts/{id}
/// Resume a draft. Missing means expired or never created.
async fn load_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<OnboardingDraft>, AppError> {
    let draft = state
        .draft_store
        .get_draft(draft_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Draft not found or expired".to_string()))?;

    Ok(Json(draft))
}

/// PUT /v1/onboarding/drafts/{id}
/// Merge a step payload into the draft. Shape checks run on every save;
/// required-field checks wait until finalize.
async fn save_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(update): Json<DraftUpdate>,
) -> Result<Json<OnboardingDraft>, AppError> {
    let mut draft = state
        .draft_store
        .get_draft(draft_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Draft not found or expired".to_string()))?;

    draft.apply(update);
    draft.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;

    state.draft_store.put_draft(&draft).await?;
    Ok(Json(draft))
}

/// POST /v1/onboarding/drafts/{id}/finalize
/// Turn the draft into the account's profile. Idempotent: the auth
/// redirect can fire twice, so an existing profile is a no-op success.
async fn finalize_draft(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<FinalizeResponse>, AppError> {
    // 1. An already-finalized profile wins over whatever the draft says
    if let Some(existing) = state.profile_repo.get_profile(claims.sub).await? {
        return Ok(Json(FinalizeResponse {
            profile: existing,
            created: false,
        }));
    }

    // 2. Load the draft and materialize the profile from it
    let draft = state
        .draft_store
        .get_draft(draft_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Draft not found or expired".to_string()))?;

    let profile = draft
        .finalized_profile(claims.sub)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    // 3. Create, tolerating the double-submit race
    if let Err(err) = state.profile_repo.create_profile(&profile).await {
        return match err.downcast_ref::<CoreError>() {
            Some(CoreError::Conflict(_)) => {
                if let Some(existing) = state.profile_repo.get_profile(claims.sub).await? {
                    let _ = state.draft_store.delete_draft(draft_id).await;
                    return Ok(Json(FinalizeResponse {
                        profile: existing,
                        created: false,
                    }));
                }
                Err(AppError::ConflictError("Username is already taken".to_string()))
            }
            _ => Err(AppError::InternalServerError(err.to_string())),
        };
    }

    // 4. The draft has served its purpose
    let _ = state.draft_store.delete_draft(draft_id).await;

    info!("Profile finalized for account {}", claims.sub);
    Ok(Json(FinalizeResponse {
        profile,
        created: true,
    }))
}
