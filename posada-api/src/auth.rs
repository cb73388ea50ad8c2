use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::SessionClaims, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SessionRequest {
    pub account_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    token: String,
    account_id: Uuid,
}

#[derive(Debug, Serialize)]
struct MeResponse {
    account_id: Uuid,
    profile_exists: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/session", post(create_session))
        .route("/v1/auth/me", get(me))
}

/// POST /v1/auth/session
/// Mint a bearer token for an account. Stand-in for the external identity
/// provider: pass an account id to resume one, omit it for a fresh one.
async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<SessionRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let account_id = req.account_id.unwrap_or_else(Uuid::new_v4);

    let claims = SessionClaims {
        sub: account_id,
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(state.auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(SessionResponse { token, account_id }))
}

/// GET /v1/auth/me
/// Who the token belongs to, and whether onboarding already produced a profile.
async fn me(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<MeResponse>, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let token_data = decode::<SessionClaims>(
        bearer.token(),
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    ).map_err(|e| AppError::AuthenticationError(e.to_string()))?;

    let account_id = token_data.claims.sub;
    let profile_exists = state.profile_repo.get_profile(account_id).await?.is_some();

    Ok(Json(MeResponse {
        account_id,
        profile_exists,
    }))
}
