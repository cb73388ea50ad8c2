use async_trait::async_trait;
use posada_core::repository::{DraftStore, RateLimiter};
use posada_profile::OnboardingDraft;
use redis::{AsyncCommands, RedisResult};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn set_draft(
        &self,
        draft_id: &str,
        payload: &str,
        ttl_seconds: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("draft:{}", draft_id);
        conn.set_ex::<_, _, ()>(key, payload, ttl_seconds).await?;
        info!("Draft saved: {}", draft_id);
        Ok(())
    }

    pub async fn get_draft(&self, draft_id: &str) -> Result<Option<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("draft:{}", draft_id);
        let payload: Option<String> = conn.get(key).await?;
        Ok(payload)
    }

    pub async fn del_draft(&self, draft_id: &str) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("draft:{}", draft_id);
        conn.del(key).await
    }

    pub async fn check_rate_limit(
        &self,
        key: &str,
        limit: i64,
        window_seconds: i64,
    ) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, window_seconds)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }
}

/// Draft storage on Redis: drafts are JSON blobs under `draft:{id}` with a
/// TTL, so an abandoned wizard cleans itself up.
pub struct RedisDraftStore {
    client: RedisClient,
    ttl_seconds: u64,
}

impl RedisDraftStore {
    pub fn new(client: RedisClient, ttl_seconds: u64) -> Self {
        Self {
            client,
            ttl_seconds,
        }
    }
}

#[async_trait]
impl DraftStore for RedisDraftStore {
    async fn put_draft(
        &self,
        draft: &OnboardingDraft,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let payload = serde_json::to_string(draft)?;
        self.client
            .set_draft(&draft.draft_id.to_string(), &payload, self.ttl_seconds)
            .await?;
        Ok(())
    }

    async fn get_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<Option<OnboardingDraft>, Box<dyn std::error::Error + Send + Sync>> {
        match self.client.get_draft(&draft_id.to_string()).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn delete_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.client.del_draft(&draft_id.to_string()).await?;
        Ok(())
    }
}

pub struct RedisRateLimiter {
    client: RedisClient,
}

impl RedisRateLimiter {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let allowed = self
            .client
            .check_rate_limit(
                &format!("ratelimit:{}", key),
                max_requests as i64,
                window_secs as i64,
            )
            .await?;
        Ok(allowed)
    }
}
