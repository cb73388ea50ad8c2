use async_trait::async_trait;
use chrono::NaiveDate;
use posada_booking::{Booking, BookingStatus};
use posada_core::repository::BookingRepository;
use sqlx::PgPool;
use uuid::Uuid;

pub struct StoreBookingRepository {
    pool: PgPool,
}

impl StoreBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    host_id: Uuid,
    guest_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    message: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Booking {
            id: self.id,
            host_id: self.host_id,
            guest_id: self.guest_id,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.parse()?,
            message: self.message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_BOOKING: &str = "SELECT id, host_id, guest_id, start_date, end_date, status, message, created_at, updated_at FROM bookings";

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn create_booking(
        &self,
        booking: &Booking,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, host_id, guest_id, start_date, end_date, status, message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(booking.id)
        .bind(booking.host_id)
        .bind(booking.guest_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.status.as_str())
        .bind(&booking.message)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(booking.id)
    }

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{} WHERE id = $1", SELECT_BOOKING))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_booking()).transpose()
    }

    async fn list_bookings_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE host_id = $1 ORDER BY created_at DESC",
            SELECT_BOOKING
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_booking()).collect()
    }

    async fn list_bookings_for_guest(
        &self,
        guest_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE guest_id = $1 ORDER BY created_at DESC",
            SELECT_BOOKING
        ))
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_booking()).collect()
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_pending_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE host_id = $1 AND status = 'pending'",
        )
        .bind(host_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
