use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateBookingRequest, RescheduleBookingRequest, UpdateStatusRequest};
use crate::domain::services::{
    business_time::{parse_date, parse_time},
    scheduler::BookingRequest,
};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: provider {} at {} {}", payload.provider_id, payload.date, payload.time);

    let start = parse_date(&payload.date)?.and_time(parse_time(&payload.time)?);
    let request = BookingRequest {
        customer_id: payload.customer_id,
        provider_id: payload.provider_id,
        service_id: payload.service_id,
        start,
        duration_minutes: payload.duration_minutes,
        recurring_type: payload.recurring_type,
        recurring_count: payload.recurring_count.unwrap_or(0),
        location: payload.location,
        notes: payload.notes,
    };

    let placed = state.scheduler.place_booking(request).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.scheduler.get_booking(&booking_id).await?;
    Ok(Json(booking))
}

pub async fn list_occurrences(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let series = state.scheduler.series(&booking_id).await?;
    Ok(Json(series))
}

pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<RescheduleBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_start = parse_date(&payload.date)?.and_time(parse_time(&payload.time)?);
    let booking = state.scheduler.reschedule(&booking_id, new_start, payload.duration_minutes).await?;
    Ok(Json(booking))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.scheduler.transition_status(&booking_id, payload.status).await?;
    Ok(Json(booking))
}
