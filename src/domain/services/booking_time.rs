use chrono::NaiveDateTime;
use crate::error::AppError;

pub const DEFAULT_ADVANCE_BOOKING_DAYS: i64 = 30;

/// Booking-window policy on calendar days of the business clock: nothing on a
/// past day, nothing more than `max_advance_days` ahead (that day included).
pub fn validate_booking_time(
    start: NaiveDateTime,
    now: NaiveDateTime,
    max_advance_days: i64,
) -> Result<(), AppError> {
    let today = now.date();
    let day = start.date();

    if day < today {
        return Err(AppError::PastBooking);
    }

    if (day - today).num_days() > max_advance_days {
        return Err(AppError::AdvanceWindow { max_days: max_advance_days });
    }

    Ok(())
}
