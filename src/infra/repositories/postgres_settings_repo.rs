use crate::domain::{models::setting::Setting, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSettingsRepo {
    pool: PgPool,
}

impl PostgresSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepo {
    async fn get(&self, category: &str, key: &str) -> Result<Option<Setting>, AppError> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE category = $1 AND key = $2").bind(category).bind(key).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert(&self, setting: &Setting) -> Result<Setting, AppError> {
        sqlx::query_as::<_, Setting>("INSERT INTO settings (category, key, value, updated_at) VALUES ($1, $2, $3, $4) ON CONFLICT (category, key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at RETURNING *").bind(&setting.category).bind(&setting.key).bind(&setting.value).bind(setting.updated_at).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
