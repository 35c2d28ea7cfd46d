use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub duration_minutes: i32,
    #[sqlx(skip)]
    pub assigned_provider_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(name: String, duration_minutes: i32, assigned_provider_ids: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            duration_minutes,
            assigned_provider_ids,
            created_at: Utc::now(),
        }
    }

    pub fn has_assigned_providers(&self) -> bool {
        !self.assigned_provider_ids.is_empty()
    }
}
