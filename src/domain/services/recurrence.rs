use chrono::Duration;
use chrono_tz::Tz;
use uuid::Uuid;

use crate::domain::models::booking::{Booking, BookingStatus, SkippedOccurrence};
use crate::domain::services::business_time::{resolve_local, utc_to_local};

/// Follow-ups of a recurring request, split into those that exist on the
/// business clock and those whose wall-clock time was skipped by a DST change.
#[derive(Debug, Default)]
pub struct Expansion {
    pub instances: Vec<Booking>,
    pub skipped: Vec<SkippedOccurrence>,
}

/// Follow-up occurrences of `parent`: `recurring_count - 1` bookings, the
/// i-th shifted by `i` days (daily) or `7i` days (weekly) on the business
/// clock so the wall-clock time survives DST changes. A repeated wall-clock
/// time takes its first occurrence.
pub fn expand_recurring(parent: &Booking, tz: &Tz) -> Expansion {
    let mut expansion = Expansion::default();
    let Some(step_days) = parent.recurring_type.step_days() else {
        return expansion;
    };
    if parent.recurring_count < 2 {
        return expansion;
    }

    let local_start = utc_to_local(tz, parent.start_time);

    for i in 1..parent.recurring_count as i64 {
        let local = local_start + Duration::days(step_days * i);
        let Some(start) = resolve_local(tz, local) else {
            expansion.skipped.push(SkippedOccurrence {
                start_time: None,
                local_start: local,
                reason: format!("{} does not exist on the business clock (DST change)", local.format("%Y-%m-%d %H:%M")),
            });
            continue;
        };

        let mut instance = parent.clone();
        instance.id = Uuid::new_v4().to_string();
        instance.status = BookingStatus::Pending;
        instance.recurring_parent_id = Some(parent.id.clone());
        instance.reschedule_to(start, parent.duration_minutes);
        expansion.instances.push(instance);
    }

    expansion
}
