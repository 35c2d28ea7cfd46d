use crate::domain::{models::booking::{Booking, BookingStatus}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use chrono::{DateTime, Utc};

const INSERT_BOOKING: &str =
    "INSERT INTO bookings (id, customer_id, provider_id, service_id, start_time, end_time, duration_minutes, status, recurring_type, recurring_count, recurring_parent_id, location, notes, created_at)
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
     RETURNING *";

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert_in(tx: &mut Transaction<'_, Sqlite>, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(INSERT_BOOKING)
            .bind(&booking.id).bind(&booking.customer_id).bind(&booking.provider_id).bind(&booking.service_id)
            .bind(booking.start_time).bind(booking.end_time).bind(booking.duration_minutes)
            .bind(booking.status.as_str()).bind(booking.recurring_type.as_str()).bind(booking.recurring_count)
            .bind(&booking.recurring_parent_id).bind(&booking.location).bind(&booking.notes).bind(booking.created_at)
            .fetch_one(&mut **tx).await.map_err(AppError::Database)
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn insert(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut saved = self.insert_batch(std::slice::from_ref(booking)).await?;
        saved.pop().ok_or(AppError::Internal("Insert returned no row".into()))
    }

    async fn insert_batch(&self, bookings: &[Booking]) -> Result<Vec<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut saved = Vec::with_capacity(bookings.len());
        for booking in bookings {
            saved.push(Self::insert_in(&mut tx, booking).await?);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn active_bookings_for(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE provider_id = ? AND start_time < ? AND end_time > ? AND status != 'cancelled' ORDER BY start_time ASC"
        )
            .bind(provider_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, booking: &Booking) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET start_time=?, end_time=?, duration_minutes=?, location=?, notes=?
             WHERE id=? AND status NOT IN ('cancelled', 'completed')
             RETURNING *"
        )
            .bind(booking.start_time).bind(booking.end_time).bind(booking.duration_minutes)
            .bind(&booking.location).bind(&booking.notes)
            .bind(&booking.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, from: BookingStatus, to: BookingStatus) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = ? WHERE id = ? AND status = ? RETURNING *")
            .bind(to.as_str()).bind(id).bind(from.as_str())
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_recurring_parent(&self, parent_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE recurring_parent_id = ? ORDER BY start_time ASC")
            .bind(parent_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
