use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::UpsertSettingRequest;
use crate::domain::models::setting::Setting;
use crate::domain::services::settings::validate_setting;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path((category, key)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let setting = state.settings_repo.get(&category, &key).await?
        .ok_or(AppError::NotFound(format!("Setting {}.{} not set", category, key)))?;
    Ok(Json(setting))
}

pub async fn upsert_setting(
    State(state): State<Arc<AppState>>,
    Path((category, key)): Path<(String, String)>,
    Json(payload): Json<UpsertSettingRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_setting(&category, &key, &payload.value)?;
    let saved = state.settings_repo.upsert(&Setting::new(&category, &key, payload.value)).await?;
    info!("Setting {}.{} updated", saved.category, saved.key);
    Ok(Json(saved))
}
