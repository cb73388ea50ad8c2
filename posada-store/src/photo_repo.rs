use async_trait::async_trait;
use posada_core::repository::PhotoRepository;
use posada_profile::AccommodationPhoto;
use sqlx::PgPool;
use uuid::Uuid;

pub struct StorePhotoRepository {
    pool: PgPool,
}

impl StorePhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: Uuid,
    user_id: Uuid,
    photo_url: String,
    display_order: i32,
    caption: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl PhotoRow {
    fn into_photo(self) -> AccommodationPhoto {
        AccommodationPhoto {
            id: self.id,
            user_id: self.user_id,
            photo_url: self.photo_url,
            display_order: self.display_order,
            caption: self.caption,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl PhotoRepository for StorePhotoRepository {
    async fn add_photo(
        &self,
        photo: &AccommodationPhoto,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO accommodation_photos (id, user_id, photo_url, display_order, caption, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(photo.id)
        .bind(photo.user_id)
        .bind(&photo.photo_url)
        .bind(photo.display_order)
        .bind(&photo.caption)
        .bind(photo.created_at)
        .execute(&self.pool)
        .await?;

        Ok(photo.id)
    }

    async fn list_photos(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<AccommodationPhoto>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            "SELECT id, user_id, photo_url, display_order, caption, created_at FROM accommodation_photos WHERE user_id = $1 ORDER BY display_order",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_photo()).collect())
    }

    async fn delete_photo(
        &self,
        id: Uuid,
        profile_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query("DELETE FROM accommodation_photos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn next_display_order(
        &self,
        profile_id: Uuid,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(display_order) + 1, 0) FROM accommodation_photos WHERE user_id = $1",
        )
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(next)
    }
}
