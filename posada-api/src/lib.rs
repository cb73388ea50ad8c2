use axum::{
    extract::{ConnectInfo, State},
    http::Method,
    response::IntoResponse,
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod availabilities;
pub mod bookings;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod onboarding;
pub mod photos;
pub mod profiles;
pub mod state;
pub mod username;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let public = Router::new()
        .merge(auth::routes())
        .merge(username::routes())
        .merge(onboarding::routes())
        .merge(profiles::routes())
        .merge(bookings::routes());

    let protected = Router::new()
        .merge(onboarding::protected_routes())
        .merge(profiles::protected_routes())
        .merge(dashboard::routes())
        .merge(availabilities::routes())
        .merge(bookings::protected_routes())
        .merge(photos::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, impl IntoResponse> {
    // ConnectInfo is absent when the router is driven without a socket,
    // as in tests; those callers share one bucket.
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let allowed = state
        .rate_limiter
        .check_rate_limit(&ip, state.rules.rate_limit_requests, state.rules.rate_limit_window_seconds)
        .await;

    match allowed {
        Ok(true) => Ok(next.run(req).await),
        Ok(false) => Err((axum::http::StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")),
        Err(_) => Ok(next.run(req).await), // Fail open
    }
}
