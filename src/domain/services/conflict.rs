use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;
use std::cmp::min;

use crate::domain::models::{booking::Booking, service::Service};
use crate::domain::services::availability::AvailabilitySpan;
use crate::domain::services::business_time::utc_to_local;
use crate::error::AppError;

/// A non-cancelled booking projected onto the business clock.
#[derive(Debug, Clone)]
pub struct Occupied {
    pub booking_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occupied {
    pub fn from_booking(booking: &Booking, tz: &Tz) -> Self {
        Self {
            booking_id: booking.id.clone(),
            start: utc_to_local(tz, booking.start_time),
            end: utc_to_local(tz, booking.end_time),
        }
    }
}

/// Cancelled bookings never occupy time. `exclude` removes the booking being edited.
pub fn occupied_from(bookings: &[Booking], tz: &Tz, exclude: Option<&str>) -> Vec<Occupied> {
    bookings
        .iter()
        .filter(|b| !b.is_cancelled())
        .filter(|b| exclude != Some(b.id.as_str()))
        .map(|b| Occupied::from_booking(b, tz))
        .collect()
}

/// Services without assigned providers bypass conflict checks when the flag is on.
pub fn skips_conflict_checks(service: &Service, skip_unassigned: bool) -> bool {
    skip_unassigned && !service.has_assigned_providers()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SlotPartition {
    pub available: Vec<NaiveTime>,
    pub booked: Vec<NaiveTime>,
}

pub struct ConflictScanner<'a> {
    interval_minutes: i32,
    availability: &'a [AvailabilitySpan],
    grid_start: NaiveDateTime,
    grid_end: NaiveDateTime,
    occupied: Vec<Occupied>,
}

impl<'a> ConflictScanner<'a> {
    pub fn new(
        interval_minutes: i32,
        availability: &'a [AvailabilitySpan],
        grid_bounds: (NaiveDateTime, NaiveDateTime),
        occupied: Vec<Occupied>,
    ) -> Self {
        Self {
            interval_minutes,
            availability,
            grid_start: grid_bounds.0,
            grid_end: grid_bounds.1,
            occupied,
        }
    }

    /// Adds time that is not yet persisted, e.g. earlier occurrences of the same series.
    pub fn occupy(&mut self, booking_id: &str, start: NaiveDateTime, end: NaiveDateTime) {
        self.occupied.push(Occupied { booking_id: booking_id.to_string(), start, end });
    }

    fn booked_at(&self, instant: NaiveDateTime) -> bool {
        self.occupied.iter().any(|o| o.start <= instant && instant < o.end)
    }

    /// Splits the in-hours slots of `date` into available and booked.
    pub fn partition(&self, date: NaiveDate, in_hours: &[NaiveTime]) -> SlotPartition {
        let mut partition = SlotPartition::default();
        for slot in in_hours {
            if self.booked_at(date.and_time(*slot)) {
                partition.booked.push(*slot);
            } else {
                partition.available.push(*slot);
            }
        }
        partition
    }

    /// Rejects a candidate that overlaps an occupied span, or whose duration,
    /// walked in interval steps, leaves the provider's working hours.
    pub fn validate_candidate(&self, start: NaiveDateTime, duration_minutes: i32) -> Result<(), AppError> {
        if duration_minutes <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }
        if self.interval_minutes <= 0 {
            return Err(AppError::Validation("Slot interval must be positive".into()));
        }

        // The grid restarts at :00 every hour.
        if start.second() != 0 || start.minute() % self.interval_minutes as u32 != 0 {
            return Err(AppError::Validation(format!(
                "Start time {} is not on the {}-minute slot grid",
                start.format("%H:%M"),
                self.interval_minutes
            )));
        }

        let end = start + Duration::minutes(duration_minutes as i64);

        if let Some(clash) = self.occupied.iter().find(|o| start < o.end && end > o.start) {
            return Err(AppError::Conflict(format!(
                "Requested time overlaps an existing booking ({} - {})",
                clash.start.format("%Y-%m-%d %H:%M"),
                clash.end.format("%H:%M")
            )));
        }

        let step = Duration::minutes(self.interval_minutes as i64);
        let mut cursor = start;
        while cursor < end {
            let segment_end = min(cursor + step, end);
            let on_grid = cursor >= self.grid_start && cursor <= self.grid_end;
            let covered = self.availability.iter().any(|s| s.covers(cursor, segment_end));

            if !on_grid || !covered {
                let msg = if cursor == start {
                    "Requested time is outside the provider's working hours"
                } else {
                    "Appointment would run past the end of the provider's working hours"
                };
                return Err(AppError::Conflict(msg.into()));
            }
            cursor = segment_end;
        }

        Ok(())
    }
}
