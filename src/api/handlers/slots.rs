use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::debug;

use crate::api::dtos::{requests::SlotsQuery, responses::SlotsResponse};
use crate::domain::services::{business_time::parse_date, scheduler::SlotFilter};
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&params.date)?;
    let filter = SlotFilter {
        location: params.location,
        exclude_booking_id: params.exclude_booking_id,
    };

    let response = match state.scheduler.classify_slots(&provider_id, date, &filter).await {
        Ok(slots) => SlotsResponse::available(params.date, slots),
        Err(AppError::Unavailable(reason)) => {
            debug!("get_slots: {}", reason);
            SlotsResponse::unavailable(params.date)
        }
        Err(e) => return Err(e),
    };

    Ok(Json(response))
}
