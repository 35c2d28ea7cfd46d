use crate::domain::models::booking::{BookingStatus, RecurringType};
use serde::Deserialize;

/// Query string of the slot listing.
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    pub location: Option<String>,
    pub exclude_booking_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer_id: String,
    pub provider_id: String,
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub recurring_type: RecurringType,
    pub recurring_count: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct RescheduleBookingRequest {
    pub date: String,
    pub time: String,
    pub duration_minutes: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

#[derive(Deserialize)]
pub struct CreateWindowRequest {
    pub date: Option<String>,
    pub day_of_week: Option<i32>,
    pub start_time: String,
    pub end_time: String,
    pub is_available: Option<bool>,
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub provider_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpsertSettingRequest {
    pub value: String,
}
