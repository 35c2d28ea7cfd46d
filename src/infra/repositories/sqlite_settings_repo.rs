use crate::domain::{models::setting::Setting, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn get(&self, category: &str, key: &str) -> Result<Option<Setting>, AppError> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE category = ? AND key = ?")
            .bind(category).bind(key)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert(&self, setting: &Setting) -> Result<Setting, AppError> {
        sqlx::query_as::<_, Setting>(
            "INSERT INTO settings (category, key, value, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(category, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(&setting.category).bind(&setting.key).bind(&setting.value).bind(setting.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
