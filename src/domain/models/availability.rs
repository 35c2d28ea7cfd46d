use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A provider availability window. `date = None` means the window recurs on
/// `day_of_week` (0 = Sunday .. 6 = Saturday).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityWindow {
    pub id: String,
    pub provider_id: String,
    pub date: Option<NaiveDate>,
    pub day_of_week: Option<i32>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewWindowParams {
    pub provider_id: String,
    pub date: Option<NaiveDate>,
    pub day_of_week: Option<i32>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub location: Option<String>,
}

pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

impl AvailabilityWindow {
    pub fn new(params: NewWindowParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id: params.provider_id,
            date: params.date,
            day_of_week: params.day_of_week,
            start_time: params.start_time,
            end_time: params.end_time,
            is_available: params.is_available,
            location: params.location,
            created_at: Utc::now(),
        }
    }

    pub fn is_date_specific(&self) -> bool {
        self.date.is_some()
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Whether this window is defined for `date`, either explicitly or by weekday.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        match self.date {
            Some(d) => d == date,
            None => self.day_of_week == Some(weekday_index(date)),
        }
    }

    /// Unscoped windows apply everywhere.
    pub fn applies_to_location(&self, location: Option<&str>) -> bool {
        match (self.location.as_deref(), location) {
            (None, _) | (_, None) => true,
            (Some(own), Some(wanted)) => own == wanted,
        }
    }

    /// Absolute bounds of the window on `date`, pushing a wrapped end into the next day.
    pub fn bounds_on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.start_time);
        let end_date = if self.wraps_midnight() { date + Duration::days(1) } else { date };
        (start, end_date.and_time(self.end_time))
    }
}
