use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut saved = sqlx::query_as::<_, Service>("INSERT INTO services (id, name, duration_minutes, created_at) VALUES ($1, $2, $3, $4) RETURNING *").bind(&service.id).bind(&service.name).bind(service.duration_minutes).bind(service.created_at).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        for provider_id in &service.assigned_provider_ids {
            sqlx::query("INSERT INTO service_providers (service_id, provider_id) VALUES ($1, $2)").bind(&service.id).bind(provider_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        saved.assigned_provider_ids = service.assigned_provider_ids.clone();
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        let Some(mut service) = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)? else {
            return Ok(None);
        };
        service.assigned_provider_ids = sqlx::query_scalar::<_, String>("SELECT provider_id FROM service_providers WHERE service_id = $1 ORDER BY provider_id").bind(id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(Some(service))
    }
}
