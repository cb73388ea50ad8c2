use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use posada_api::{
    app,
    state::{AppState, AuthConfig},
};
use posada_store::memory::{
    MemoryAvailabilityRepository, MemoryBookingRepository, MemoryDraftStore,
    MemoryPhotoRepository, MemoryProfileRepository, MemoryRateLimiter,
};
use posada_store::{
    availability_repo::StoreAvailabilityRepository, booking_repo::StoreBookingRepository,
    photo_repo::StorePhotoRepository, profile_repo::StoreProfileRepository,
    redis_repo::{RedisDraftStore, RedisRateLimiter},
    DbClient, RedisClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posada_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = posada_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Posada API on port {}", config.server.port);

    let auth = AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        expiration: config.auth.jwt_expiration_seconds,
    };

    let app_state = if config.server.demo {
        tracing::info!("Demo mode: serving from in-memory stores");

        AppState {
            profile_repo: Arc::new(MemoryProfileRepository::default()),
            availability_repo: Arc::new(MemoryAvailabilityRepository::default()),
            booking_repo: Arc::new(MemoryBookingRepository::default()),
            photo_repo: Arc::new(MemoryPhotoRepository::default()),
            draft_store: Arc::new(MemoryDraftStore::new(Duration::from_secs(
                config.rules.draft_ttl_seconds,
            ))),
            rate_limiter: Arc::new(MemoryRateLimiter::default()),
            auth,
            rules: config.rules.clone(),
        }
    } else {
        // Postgres Connection
        let db = DbClient::new(&config.database.url)
            .await
            .expect("Failed to connect to Postgres");
        db.migrate().await.expect("Failed to run migrations");

        // Redis Connection
        let redis = RedisClient::new(&config.redis.url)
            .await
            .expect("Failed to connect to Redis");

        AppState {
            profile_repo: Arc::new(StoreProfileRepository::new(db.pool.clone())),
            availability_repo: Arc::new(StoreAvailabilityRepository::new(db.pool.clone())),
            booking_repo: Arc::new(StoreBookingRepository::new(db.pool.clone())),
            photo_repo: Arc::new(StorePhotoRepository::new(db.pool.clone())),
            draft_store: Arc::new(RedisDraftStore::new(
                redis.clone(),
                config.rules.draft_ttl_seconds,
            )),
            rate_limiter: Arc::new(RedisRateLimiter::new(redis)),
            auth,
            rules: config.rules.clone(),
        }
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>()
    ).await.unwrap();
}
