use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateWindowRequest;
use crate::domain::models::availability::{AvailabilityWindow, NewWindowParams};
use crate::domain::services::business_time::{parse_date, parse_time};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_window(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Json(payload): Json<CreateWindowRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = match (&payload.date, payload.day_of_week) {
        (Some(date), None) => Some(parse_date(date)?),
        (None, Some(day)) if (0..=6).contains(&day) => None,
        (None, Some(day)) => {
            return Err(AppError::Validation(format!("day_of_week must be 0 (Sunday) to 6, got {}", day)));
        }
        _ => return Err(AppError::Validation("Exactly one of date or day_of_week is required".into())),
    };

    let start_time = parse_time(&payload.start_time)?;
    let end_time = parse_time(&payload.end_time)?;
    if start_time == end_time {
        return Err(AppError::Validation("Window start and end must differ".into()));
    }

    let window = AvailabilityWindow::new(NewWindowParams {
        provider_id,
        date,
        day_of_week: payload.day_of_week,
        start_time,
        end_time,
        is_available: payload.is_available.unwrap_or(true),
        location: payload.location.filter(|l| !l.trim().is_empty()),
    });

    let saved = state.availability_repo.create(&window).await?;
    info!("Availability window {} created for provider {}", saved.id, saved.provider_id);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_windows(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let windows = state.availability_repo.list_by_provider(&provider_id).await?;
    Ok(Json(windows))
}

pub async fn delete_window(
    State(state): State<Arc<AppState>>,
    Path(window_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.availability_repo.delete(&window_id).await?;
    info!("Availability window {} deleted", window_id);
    Ok(StatusCode::NO_CONTENT)
}
