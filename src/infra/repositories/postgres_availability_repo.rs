use crate::domain::{models::availability::{weekday_index, AvailabilityWindow}, ports::AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresAvailabilityRepo {
    pool: PgPool,
}

impl PostgresAvailabilityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepo {
    async fn create(&self, window: &AvailabilityWindow) -> Result<AvailabilityWindow, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>("INSERT INTO availability_windows (id, provider_id, date, day_of_week, start_time, end_time, is_available, location, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *").bind(&window.id).bind(&window.provider_id).bind(window.date).bind(window.day_of_week).bind(window.start_time).bind(window.end_time).bind(window.is_available).bind(&window.location).bind(window.created_at).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn windows_for(&self, provider_id: &str, date: NaiveDate) -> Result<Vec<AvailabilityWindow>, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>("SELECT * FROM availability_windows WHERE provider_id = $1 AND (date = $2 OR (date IS NULL AND day_of_week = $3)) ORDER BY start_time ASC").bind(provider_id).bind(date).bind(weekday_index(date)).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<AvailabilityWindow>, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>("SELECT * FROM availability_windows WHERE provider_id = $1 ORDER BY date ASC NULLS FIRST, day_of_week ASC, start_time ASC").bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM availability_windows WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Availability window not found".into()));
        }
        Ok(())
    }
}
