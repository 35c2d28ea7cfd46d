use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteServiceRepo {
    pool: SqlitePool,
}

impl SqliteServiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn provider_ids(&self, service_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT provider_id FROM service_providers WHERE service_id = ? ORDER BY provider_id")
            .bind(service_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut saved = sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, name, duration_minutes, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&service.id).bind(&service.name).bind(service.duration_minutes).bind(service.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for provider_id in &service.assigned_provider_ids {
            sqlx::query("INSERT INTO service_providers (service_id, provider_id) VALUES (?, ?)")
                .bind(&service.id).bind(provider_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;

        saved.assigned_provider_ids = service.assigned_provider_ids.clone();
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        match service {
            Some(mut s) => {
                s.assigned_provider_ids = self.provider_ids(&s.id).await?;
                Ok(Some(s))
            }
            None => Ok(None),
        }
    }
}
