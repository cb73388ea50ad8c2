use async_trait::async_trait;
use chrono::NaiveDate;
use posada_calendar::Availability;
use posada_core::repository::AvailabilityRepository;
use sqlx::PgPool;
use uuid::Uuid;

pub struct StoreAvailabilityRepository {
    pool: PgPool,
}

impl StoreAvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct AvailabilityRow {
    id: Uuid,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    accommodation_status: Option<String>,
    payment_type: Option<String>,
    price_amount: Option<i32>,
    price_currency: String,
    favor_description: Option<String>,
    notes: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl AvailabilityRow {
    fn into_availability(self) -> Result<Availability, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Availability {
            id: self.id,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
            accommodation_status: self.accommodation_status.map(|s| s.parse()).transpose()?,
            payment_type: self.payment_type.map(|s| s.parse()).transpose()?,
            price_amount: self.price_amount,
            price_currency: self.price_currency,
            favor_description: self.favor_description,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

const SELECT_AVAILABILITY: &str = "SELECT id, user_id, start_date, end_date, accommodation_status, payment_type, price_amount, price_currency, favor_description, notes, created_at FROM availabilities";

#[async_trait]
impl AvailabilityRepository for StoreAvailabilityRepository {
    async fn create_availability(
        &self,
        availability: &Availability,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO availabilities (id, user_id, start_date, end_date, accommodation_status, payment_type, price_amount, price_currency, favor_description, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(availability.id)
        .bind(availability.user_id)
        .bind(availability.start_date)
        .bind(availability.end_date)
        .bind(availability.accommodation_status.map(|v| v.as_str()))
        .bind(availability.payment_type.map(|v| v.as_str()))
        .bind(availability.price_amount)
        .bind(&availability.price_currency)
        .bind(&availability.favor_description)
        .bind(&availability.notes)
        .bind(availability.created_at)
        .execute(&self.pool)
        .await?;

        Ok(availability.id)
    }

    async fn get_availability(
        &self,
        id: Uuid,
    ) -> Result<Option<Availability>, Box<dyn std::error::Error + Send + Sync>> {
        let row =
            sqlx::query_as::<_, AvailabilityRow>(&format!("{} WHERE id = $1", SELECT_AVAILABILITY))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.into_availability()).transpose()
    }

    async fn list_availabilities(
        &self,
        host_id: Uuid,
        min_end_date: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = match min_end_date {
            Some(min) => {
                sqlx::query_as::<_, AvailabilityRow>(&format!(
                    "{} WHERE user_id = $1 AND end_date >= $2 ORDER BY start_date",
                    SELECT_AVAILABILITY
                ))
                .bind(host_id)
                .bind(min)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AvailabilityRow>(&format!(
                    "{} WHERE user_id = $1 ORDER BY start_date",
                    SELECT_AVAILABILITY
                ))
                .bind(host_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(|r| r.into_availability()).collect()
    }

    async fn delete_availability(
        &self,
        id: Uuid,
        host_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query("DELETE FROM availabilities WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(host_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
