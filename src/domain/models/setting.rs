use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Setting {
    pub category: String,
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    pub fn new(category: &str, key: &str, value: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            key: key.to_string(),
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}
