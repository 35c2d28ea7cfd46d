use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::config::{Config, RecurrencePolicy};
use crate::domain::models::{
    booking::{Booking, BookingStatus, NewBookingParams, PlacedBooking, RecurringBookingSet, RecurringType, SkippedOccurrence},
    service::Service,
    slot::SlotClassification,
};
use crate::domain::ports::{AvailabilityRepository, BookingRepository, Clock, ServiceRepository};
use crate::domain::services::{
    availability::{availability_spans, in_hours_slots, AvailabilitySpan},
    booking_time::validate_booking_time,
    business_time::{day_start_utc, local_to_utc, utc_to_local},
    conflict::{occupied_from, skips_conflict_checks, ConflictScanner, Occupied},
    locks::ProviderLocks,
    recurrence::expand_recurring,
    settings::{SchedulingSettings, SettingsResolver},
    slot_grid::{build_slot_grid, format_slot},
};
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct SchedulerPolicy {
    pub recurrence: RecurrencePolicy,
    pub skip_conflicts_for_unassigned_services: bool,
    pub max_recurring_count: i32,
}

impl SchedulerPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            recurrence: config.recurrence_policy,
            skip_conflicts_for_unassigned_services: config.skip_conflicts_for_unassigned_services,
            max_recurring_count: config.max_recurring_count,
        }
    }
}

/// A placement request; `start` is wall-clock time on the business clock.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer_id: String,
    pub provider_id: String,
    pub service_id: String,
    pub start: NaiveDateTime,
    pub duration_minutes: Option<i32>,
    pub recurring_type: RecurringType,
    pub recurring_count: i32,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl BookingRequest {
    fn validate(&self, max_recurring_count: i32) -> Result<(), AppError> {
        for (name, value) in [
            ("customer_id", &self.customer_id),
            ("provider_id", &self.provider_id),
            ("service_id", &self.service_id),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{} is required", name)));
            }
        }
        if let Some(d) = self.duration_minutes
            && d <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }
        if self.recurring_count < 0 {
            return Err(AppError::Validation("recurring_count cannot be negative".into()));
        }
        if self.recurring_count > max_recurring_count {
            return Err(AppError::Validation(format!(
                "recurring_count cannot exceed {}", max_recurring_count
            )));
        }
        Ok(())
    }

    fn is_recurring(&self) -> bool {
        self.recurring_type != RecurringType::None && self.recurring_count >= 2
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlotFilter {
    pub location: Option<String>,
    /// The booking being edited, whose own time must not show as booked.
    pub exclude_booking_id: Option<String>,
}

struct DayPlan {
    grid: Vec<NaiveTime>,
    spans: Vec<AvailabilitySpan>,
    grid_bounds: (NaiveDateTime, NaiveDateTime),
}

/// Errors that reject a single occurrence without aborting the whole series.
fn is_policy_rejection(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Validation(_)
            | AppError::Unavailable(_)
            | AppError::Conflict(_)
            | AppError::PastBooking
            | AppError::AdvanceWindow { .. }
    )
}

fn ensure_reschedulable(booking: &Booking) -> Result<(), AppError> {
    if booking.status.is_terminal() {
        return Err(AppError::Validation(format!(
            "Cannot reschedule a {} booking", booking.status.as_str()
        )));
    }
    Ok(())
}

pub struct BookingScheduler {
    settings: SettingsResolver,
    availability_repo: Arc<dyn AvailabilityRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    clock: Arc<dyn Clock>,
    locks: ProviderLocks,
    timezone: Tz,
    policy: SchedulerPolicy,
}

impl BookingScheduler {
    pub fn new(
        settings: SettingsResolver,
        availability_repo: Arc<dyn AvailabilityRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        policy: SchedulerPolicy,
    ) -> Self {
        Self {
            settings,
            availability_repo,
            booking_repo,
            service_repo,
            clock,
            locks: ProviderLocks::new(),
            timezone,
            policy,
        }
    }

    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }

    async fn plan_day(
        &self,
        settings: &SchedulingSettings,
        provider_id: &str,
        date: NaiveDate,
        location: Option<&str>,
    ) -> Result<DayPlan, AppError> {
        let hours = settings.business_hours;
        let grid = build_slot_grid(hours.start_hour, hours.end_hour, settings.slot_interval_minutes);

        let windows = self.availability_repo.windows_for(provider_id, date).await?;
        let spans = availability_spans(&windows, date, location);

        let first = NaiveTime::from_hms_opt(hours.start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let last = NaiveTime::from_hms_opt(hours.end_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);

        Ok(DayPlan {
            grid,
            spans,
            grid_bounds: (date.and_time(first), date.and_time(last)),
        })
    }

    /// Bookings that can touch `date`, including spill-over from the adjacent days.
    async fn occupied_around(
        &self,
        provider_id: &str,
        date: NaiveDate,
        exclude: Option<&str>,
    ) -> Result<Vec<Occupied>, AppError> {
        let from = day_start_utc(&self.timezone, date - Duration::days(1))?;
        let to = day_start_utc(&self.timezone, date + Duration::days(2))?;
        let bookings = self.booking_repo.active_bookings_for(provider_id, from, to).await?;
        Ok(occupied_from(&bookings, &self.timezone, exclude))
    }

    async fn find_service(&self, service_id: &str) -> Result<Service, AppError> {
        self.service_repo.find_by_id(service_id).await?
            .ok_or(AppError::NotFound("Service not found".into()))
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking, AppError> {
        self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }

    /// The whole recurring series a booking belongs to, parent first.
    pub async fn series(&self, booking_id: &str) -> Result<Vec<Booking>, AppError> {
        let booking = self.get_booking(booking_id).await?;
        let parent = match &booking.recurring_parent_id {
            Some(parent_id) => self.get_booking(parent_id).await?,
            None => booking,
        };
        let mut series = vec![parent];
        let children = self.booking_repo.list_by_recurring_parent(&series[0].id).await?;
        series.extend(children);
        Ok(series)
    }

    /// Read path: the in-hours grid of a provider's day split into available and booked.
    pub async fn classify_slots(
        &self,
        provider_id: &str,
        date: NaiveDate,
        filter: &SlotFilter,
    ) -> Result<SlotClassification, AppError> {
        if provider_id.trim().is_empty() {
            return Err(AppError::Validation("provider_id is required".into()));
        }

        let settings = self.settings.resolve().await?;
        let plan = self.plan_day(&settings, provider_id, date, filter.location.as_deref()).await?;

        if plan.spans.is_empty() {
            return Err(AppError::Unavailable(format!("Provider has no availability on {}", date)));
        }

        let in_hours = in_hours_slots(&plan.grid, date, &plan.spans);
        let occupied = self.occupied_around(provider_id, date, filter.exclude_booking_id.as_deref()).await?;
        let scanner = ConflictScanner::new(settings.slot_interval_minutes, &plan.spans, plan.grid_bounds, occupied);
        let partition = scanner.partition(date, &in_hours);

        debug!(
            "classify_slots: provider {} on {}: {} in hours, {} booked",
            provider_id, date, in_hours.len(), partition.booked.len()
        );

        Ok(SlotClassification {
            all_slots: in_hours.into_iter().map(format_slot).collect(),
            available_slots: partition.available.into_iter().map(format_slot).collect(),
            booked_slots: partition.booked.into_iter().map(format_slot).collect(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn check_candidate(
        &self,
        settings: &SchedulingSettings,
        provider_id: &str,
        start: NaiveDateTime,
        duration_minutes: i32,
        location: Option<&str>,
        exclude: Option<&str>,
        siblings: &[&Booking],
        enforce_conflicts: bool,
    ) -> Result<(), AppError> {
        let date = start.date();
        let plan = self.plan_day(settings, provider_id, date, location).await?;

        if plan.spans.is_empty() {
            return Err(AppError::Unavailable(format!("Provider has no availability on {}", date)));
        }

        if !enforce_conflicts {
            debug!("Skipping conflict checks: service has no assigned provider");
            return Ok(());
        }

        let occupied = self.occupied_around(provider_id, date, exclude).await?;
        let mut scanner = ConflictScanner::new(settings.slot_interval_minutes, &plan.spans, plan.grid_bounds, occupied);
        for sibling in siblings {
            scanner.occupy(
                &sibling.id,
                utc_to_local(&self.timezone, sibling.start_time),
                utc_to_local(&self.timezone, sibling.end_time),
            );
        }
        scanner.validate_candidate(start, duration_minutes)
    }

    /// Write path. Everything is validated before the single batched insert,
    /// and the provider's lock is held from the booking read to the write.
    pub async fn place_booking(&self, request: BookingRequest) -> Result<PlacedBooking, AppError> {
        request.validate(self.policy.max_recurring_count)?;

        let service = self.find_service(&request.service_id).await?;
        let duration = request.duration_minutes.unwrap_or(service.duration_minutes);
        if duration <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }
        let enforce = !skips_conflict_checks(&service, self.policy.skip_conflicts_for_unassigned_services);

        let settings = self.settings.resolve().await?;
        let now = utc_to_local(&self.timezone, self.clock.now());
        validate_booking_time(request.start, now, settings.advance_booking_days)?;
        let start_utc = local_to_utc(&self.timezone, request.start)?;

        let _guard = self.locks.acquire(&request.provider_id).await;

        self.check_candidate(
            &settings,
            &request.provider_id,
            request.start,
            duration,
            request.location.as_deref(),
            None,
            &[],
            enforce,
        ).await?;

        let parent = Booking::new(NewBookingParams {
            customer_id: request.customer_id.clone(),
            provider_id: request.provider_id.clone(),
            service_id: request.service_id.clone(),
            start: start_utc,
            duration_minutes: duration,
            recurring_type: request.recurring_type,
            recurring_count: request.recurring_count,
            location: request.location.clone(),
            notes: request.notes.clone(),
        });

        let expansion = expand_recurring(&parent, &self.timezone);
        let mut instances = expansion.instances;
        let mut skipped = expansion.skipped;
        for gap in &skipped {
            warn!("Skipping occurrence at {} of series {}: {}", gap.local_start, parent.id, gap.reason);
        }
        if !instances.is_empty() && self.policy.recurrence == RecurrencePolicy::Strict {
            let (kept, rejected) = self.filter_occurrences(&settings, &parent, instances, now, enforce).await?;
            instances = kept;
            skipped.extend(rejected);
            skipped.sort_by_key(|s| s.local_start);
        }

        let mut batch = Vec::with_capacity(instances.len() + 1);
        batch.push(parent);
        batch.extend(instances);

        let mut saved = self.booking_repo.insert_batch(&batch).await?;
        let parent = saved.remove(0);

        info!(
            "Booking {} placed for provider {} at {} ({} follow-ups, {} skipped)",
            parent.id, parent.provider_id, parent.start_time, saved.len(), skipped.len()
        );

        if request.is_recurring() {
            Ok(PlacedBooking::Recurring(RecurringBookingSet { parent, instances: saved, skipped }))
        } else {
            Ok(PlacedBooking::Single(parent))
        }
    }

    /// Strict recurrence: keeps the occurrences that pass every check,
    /// counting the parent and earlier kept occurrences as occupied.
    async fn filter_occurrences(
        &self,
        settings: &SchedulingSettings,
        parent: &Booking,
        candidates: Vec<Booking>,
        now: NaiveDateTime,
        enforce: bool,
    ) -> Result<(Vec<Booking>, Vec<SkippedOccurrence>), AppError> {
        let mut accepted: Vec<Booking> = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();

        for candidate in candidates {
            let local_start = utc_to_local(&self.timezone, candidate.start_time);
            let outcome = match validate_booking_time(local_start, now, settings.advance_booking_days) {
                Err(e) => Err(e),
                Ok(()) => {
                    let mut siblings: Vec<&Booking> = vec![parent];
                    siblings.extend(accepted.iter());
                    self.check_candidate(
                        settings,
                        &candidate.provider_id,
                        local_start,
                        candidate.duration_minutes,
                        candidate.location.as_deref(),
                        None,
                        &siblings,
                        enforce,
                    ).await
                }
            };

            match outcome {
                Ok(()) => accepted.push(candidate),
                Err(e) if is_policy_rejection(&e) => {
                    warn!("Skipping occurrence at {} of series {}: {}", candidate.start_time, parent.id, e);
                    skipped.push(SkippedOccurrence {
                        start_time: Some(candidate.start_time),
                        local_start,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok((accepted, skipped))
    }

    /// Moves a booking, ignoring its own current time during the conflict scan.
    /// The booking is re-read under the provider's lock and the write only
    /// lands while it is still active.
    pub async fn reschedule(
        &self,
        booking_id: &str,
        new_start: NaiveDateTime,
        new_duration: Option<i32>,
    ) -> Result<Booking, AppError> {
        let provider_id = self.get_booking(booking_id).await?.provider_id;
        let _guard = self.locks.acquire(&provider_id).await;

        let mut booking = self.get_booking(booking_id).await?;
        ensure_reschedulable(&booking)?;

        let duration = new_duration.unwrap_or(booking.duration_minutes);
        if duration <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }

        let service = self.find_service(&booking.service_id).await?;
        let enforce = !skips_conflict_checks(&service, self.policy.skip_conflicts_for_unassigned_services);

        let settings = self.settings.resolve().await?;
        let now = utc_to_local(&self.timezone, self.clock.now());
        validate_booking_time(new_start, now, settings.advance_booking_days)?;
        let start_utc = local_to_utc(&self.timezone, new_start)?;

        self.check_candidate(
            &settings,
            &booking.provider_id,
            new_start,
            duration,
            booking.location.as_deref(),
            Some(&booking.id),
            &[],
            enforce,
        ).await?;

        booking.reschedule_to(start_utc, duration);
        let Some(updated) = self.booking_repo.update(&booking).await? else {
            // Cancelled or completed behind our back.
            let current = self.get_booking(booking_id).await?;
            ensure_reschedulable(&current)?;
            return Err(AppError::Conflict(format!("Booking {} changed during reschedule", booking_id)));
        };
        info!("Booking {} rescheduled to {}", updated.id, updated.start_time);
        Ok(updated)
    }

    pub async fn transition_status(&self, booking_id: &str, next: BookingStatus) -> Result<Booking, AppError> {
        let provider_id = self.get_booking(booking_id).await?.provider_id;
        let _guard = self.locks.acquire(&provider_id).await;

        let booking = self.get_booking(booking_id).await?;
        if booking.status == next {
            return Ok(booking);
        }
        if !booking.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Cannot move booking from {} to {}",
                booking.status.as_str(),
                next.as_str()
            )));
        }

        let updated = self.booking_repo.update_status(booking_id, booking.status, next).await?
            .ok_or(AppError::Conflict(format!("Booking {} changed status concurrently", booking_id)))?;
        info!("Booking {} is now {}", updated.id, updated.status.as_str());
        Ok(updated)
    }
}
