use async_trait::async_trait;
use posada_core::repository::ProfileRepository;
use posada_core::CoreError;
use posada_profile::{Profile, ProfileChanges};
use sqlx::PgPool;
use uuid::Uuid;

pub struct StoreProfileRepository {
    pool: PgPool,
}

impl StoreProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    username: String,
    display_name: String,
    city: String,
    country: String,
    accommodation_type: String,
    bio: Option<String>,
    avatar_url: Option<String>,
    intent: Option<String>,
    default_payment_type: Option<String>,
    default_price: Option<i32>,
    default_favor_text: Option<String>,
    default_presence: Option<String>,
    onboarding_step: i32,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Result<Profile, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Profile {
            id: self.id,
            username: self.username,
            display_name: self.display_name,
            city: self.city,
            country: self.country,
            accommodation_type: self.accommodation_type.parse()?,
            bio: self.bio,
            avatar_url: self.avatar_url,
            intent: self.intent.map(|s| s.parse()).transpose()?,
            default_payment_type: self.default_payment_type.map(|s| s.parse()).transpose()?,
            default_price: self.default_price,
            default_favor_text: self.default_favor_text,
            default_presence: self.default_presence.map(|s| s.parse()).transpose()?,
            onboarding_step: self.onboarding_step,
            created_at: self.created_at,
        })
    }
}

const SELECT_PROFILE: &str = "SELECT id, username, display_name, city, country, accommodation_type, bio, avatar_url, intent, default_payment_type, default_price, default_favor_text, default_presence, onboarding_step, created_at FROM profiles";

#[async_trait]
impl ProfileRepository for StoreProfileRepository {
    async fn create_profile(
        &self,
        profile: &Profile,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (id, username, display_name, city, country, accommodation_type, bio, avatar_url, intent, default_payment_type, default_price, default_favor_text, default_presence, onboarding_step, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.display_name)
        .bind(&profile.city)
        .bind(&profile.country)
        .bind(profile.accommodation_type.as_str())
        .bind(&profile.bio)
        .bind(&profile.avatar_url)
        .bind(profile.intent.map(|v| v.as_str()))
        .bind(profile.default_payment_type.map(|v| v.as_str()))
        .bind(profile.default_price)
        .bind(&profile.default_favor_text)
        .bind(profile.default_presence.map(|v| v.as_str()))
        .bind(profile.onboarding_step)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // Unique violation on the username (or a double insert for the
            // same account) surfaces as a conflict the handlers can map to
            // 409 instead of a bare 500.
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                Err(Box::new(CoreError::Conflict(format!(
                    "Profile for username {} already exists",
                    profile.username
                ))))
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    async fn get_profile(
        &self,
        id: Uuid,
    ) -> Result<Option<Profile>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE id = $1", SELECT_PROFILE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_profile()).transpose()
    }

    async fn get_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Profile>, Box<dyn std::error::Error + Send + Sync>> {
        let row =
            sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE username = $1", SELECT_PROFILE))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.into_profile()).transpose()
    }

    async fn username_taken(
        &self,
        username: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE username = $1")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, Box<dyn std::error::Error + Send + Sync>> {
        // Read-apply-write so the empty-string-clears semantics live in one
        // place (Profile::apply) instead of being restated in SQL.
        let row = sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE id = $1", SELECT_PROFILE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let mut profile = match row {
            Some(row) => row.into_profile()?,
            None => return Ok(None),
        };
        profile.apply(changes.clone());

        sqlx::query(
            r#"
            UPDATE profiles
            SET display_name = $1, city = $2, country = $3, accommodation_type = $4, bio = $5, avatar_url = $6, intent = $7, default_payment_type = $8, default_price = $9, default_favor_text = $10, default_presence = $11
            WHERE id = $12
            "#,
        )
        .bind(&profile.display_name)
        .bind(&profile.city)
        .bind(&profile.country)
        .bind(profile.accommodation_type.as_str())
        .bind(&profile.bio)
        .bind(&profile.avatar_url)
        .bind(profile.intent.map(|v| v.as_str()))
        .bind(profile.default_payment_type.map(|v| v.as_str()))
        .bind(profile.default_price)
        .bind(&profile.default_favor_text)
        .bind(profile.default_presence.map(|v| v.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(profile))
    }
}
