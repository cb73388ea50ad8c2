use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use posada_profile::validate_username;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct UsernameCheckParams {
    pub username: String,
}

#[derive(Debug, Serialize)]
struct UsernameCheckResponse {
    username: String,
    available: bool,
    reason: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/username/check", get(check_username))
}

/// GET /v1/username/check?username=
/// Shape check first, store lookup second. The client debounces this
/// while the user types, so it stays a cheap round trip.
async fn check_username(
    State(state): State<AppState>,
    Query(params): Query<UsernameCheckParams>,
) -> Result<Json<UsernameCheckResponse>, AppError> {
    let username = params.username.trim().to_lowercase();

    if let Err(e) = validate_username(&username) {
        return Ok(Json(UsernameCheckResponse {
            username,
            available: false,
            reason: Some(e.to_string()),
        }));
    }

    let taken = state.profile_repo.username_taken(&username).await?;
    let reason = taken.then(|| "Username is already taken".to_string());

    Ok(Json(UsernameCheckResponse {
        username,
        available: !taken,
        reason,
    }))
}
