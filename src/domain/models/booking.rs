use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown {field} value: {value}")]
pub struct ParseEnumError {
    field: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// pending -> confirmed -> completed, and pending|confirmed -> cancelled.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl FromStr for BookingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(ParseEnumError { field: "status", value: s.to_string() }),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurringType {
    #[default]
    None,
    Daily,
    Weekly,
}

impl RecurringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringType::None => "none",
            RecurringType::Daily => "daily",
            RecurringType::Weekly => "weekly",
        }
    }

    /// Days between two consecutive occurrences.
    pub fn step_days(&self) -> Option<i64> {
        match self {
            RecurringType::None => None,
            RecurringType::Daily => Some(1),
            RecurringType::Weekly => Some(7),
        }
    }
}

impl FromStr for RecurringType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RecurringType::None),
            "daily" => Ok(RecurringType::Daily),
            "weekly" => Ok(RecurringType::Weekly),
            _ => Err(ParseEnumError { field: "recurring_type", value: s.to_string() }),
        }
    }
}

impl TryFrom<String> for RecurringType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub provider_id: String,
    pub service_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    #[sqlx(try_from = "String")]
    pub recurring_type: RecurringType,
    pub recurring_count: i32,
    pub recurring_parent_id: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub customer_id: String,
    pub provider_id: String,
    pub service_id: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    pub recurring_type: RecurringType,
    pub recurring_count: i32,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let end_time = params.start + Duration::minutes(params.duration_minutes as i64);

        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            provider_id: params.provider_id,
            service_id: params.service_id,
            start_time: params.start,
            end_time,
            duration_minutes: params.duration_minutes,
            status: BookingStatus::Pending,
            recurring_type: params.recurring_type,
            recurring_count: params.recurring_count,
            recurring_parent_id: None,
            location: params.location,
            notes: params.notes,
            created_at: Utc::now(),
        }
    }

    /// Moves the booking, keeping `end_time == start_time + duration_minutes`.
    pub fn reschedule_to(&mut self, start: DateTime<Utc>, duration_minutes: i32) {
        self.start_time = start;
        self.duration_minutes = duration_minutes;
        self.end_time = start + Duration::minutes(duration_minutes as i64);
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

/// An occurrence of a recurring request that was not persisted. `start_time`
/// is empty when the wall-clock time does not exist on that day (DST gap).
#[derive(Debug, Serialize, Clone)]
pub struct SkippedOccurrence {
    pub start_time: Option<DateTime<Utc>>,
    pub local_start: NaiveDateTime,
    pub reason: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct RecurringBookingSet {
    pub parent: Booking,
    pub instances: Vec<Booking>,
    pub skipped: Vec<SkippedOccurrence>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacedBooking {
    Single(Booking),
    Recurring(RecurringBookingSet),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(start: DateTime<Utc>, minutes: i32) -> Booking {
        Booking::new(NewBookingParams {
            customer_id: "c1".into(),
            provider_id: "p1".into(),
            service_id: "s1".into(),
            start,
            duration_minutes: minutes,
            recurring_type: RecurringType::None,
            recurring_count: 0,
            location: None,
            notes: None,
        })
    }

    #[test]
    fn test_end_time_follows_duration() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
        let mut booking = sample(start, 60);
        assert_eq!(booking.end_time, start + Duration::minutes(60));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.recurring_parent_id.is_none());

        let moved = start + Duration::hours(2);
        booking.reschedule_to(moved, 45);
        assert_eq!(booking.end_time, moved + Duration::minutes(45));
        assert_eq!(booking.duration_minutes, 45);
    }

    #[test]
    fn test_status_state_machine() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(Completed.is_terminal() && Cancelled.is_terminal());
    }

    #[test]
    fn test_enum_text_round_trip_for_storage() {
        assert_eq!(BookingStatus::try_from("cancelled".to_string()).unwrap(), BookingStatus::Cancelled);
        assert_eq!(RecurringType::try_from("weekly".to_string()).unwrap(), RecurringType::Weekly);
        assert!(BookingStatus::try_from("CANCELLED".to_string()).is_err());
        assert_eq!(RecurringType::Daily.step_days(), Some(1));
        assert_eq!(RecurringType::None.step_days(), None);
    }
}
