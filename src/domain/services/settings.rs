use std::sync::Arc;
use tracing::warn;

use crate::domain::ports::SettingsRepository;
use crate::domain::services::booking_time::DEFAULT_ADVANCE_BOOKING_DAYS;
use crate::error::AppError;

pub const SLOT_INTERVAL: (&str, &str) = ("booking", "bookingTimeSlotInterval");
pub const BUSINESS_HOURS: (&str, &str) = ("system", "businessHours");
pub const ADVANCE_BOOKING_DAYS: (&str, &str) = ("booking", "advanceBookingDays");

pub const DEFAULT_SLOT_INTERVAL_MINUTES: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self { start_hour: 9, end_hour: 17 }
    }
}

impl BusinessHours {
    /// Parses `"HH:MM-HH:MM"`. Only the hours matter to the slot grid.
    pub fn parse(value: &str) -> Option<Self> {
        let (start, end) = value.trim().split_once('-')?;
        let start_hour = parse_hour(start)?;
        let end_hour = parse_hour(end)?;
        (start_hour <= end_hour).then_some(Self { start_hour, end_hour })
    }
}

fn parse_hour(value: &str) -> Option<u32> {
    let (hour, minute) = value.trim().split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    (hour < 24 && minute < 60).then_some(hour)
}

/// Rejects values of the scheduling keys that the resolver could not use.
/// Keys it does not know are stored as given.
pub fn validate_setting(category: &str, key: &str, value: &str) -> Result<(), AppError> {
    let entry = (category, key);
    let valid = if entry == SLOT_INTERVAL {
        value.trim().parse::<i32>().is_ok_and(|v| v > 0)
    } else if entry == BUSINESS_HOURS {
        BusinessHours::parse(value).is_some()
    } else if entry == ADVANCE_BOOKING_DAYS {
        value.trim().parse::<i64>().is_ok_and(|v| v >= 0)
    } else {
        true
    };
    if !valid {
        return Err(AppError::Validation(format!("Invalid value '{}' for setting {}.{}", value, category, key)));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingSettings {
    pub slot_interval_minutes: i32,
    pub business_hours: BusinessHours,
    pub advance_booking_days: i64,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            business_hours: BusinessHours::default(),
            advance_booking_days: DEFAULT_ADVANCE_BOOKING_DAYS,
        }
    }
}

pub struct SettingsResolver {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsResolver {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    async fn raw(&self, (category, key): (&str, &str)) -> Result<Option<String>, AppError> {
        Ok(self.repo.get(category, key).await?.map(|s| s.value))
    }

    pub async fn resolve(&self) -> Result<SchedulingSettings, AppError> {
        let defaults = SchedulingSettings::default();

        let slot_interval_minutes = match self.raw(SLOT_INTERVAL).await? {
            None => defaults.slot_interval_minutes,
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(v) if v > 0 => v,
                Ok(v) => return Err(AppError::Validation(format!("Slot interval must be positive, got {}", v))),
                Err(_) => {
                    warn!("Unparseable slot interval setting '{}', using default", raw);
                    defaults.slot_interval_minutes
                }
            },
        };

        let business_hours = match self.raw(BUSINESS_HOURS).await? {
            None => defaults.business_hours,
            Some(raw) => BusinessHours::parse(&raw).unwrap_or_else(|| {
                warn!("Unparseable business hours setting '{}', using default", raw);
                defaults.business_hours
            }),
        };

        let advance_booking_days = match self.raw(ADVANCE_BOOKING_DAYS).await? {
            None => defaults.advance_booking_days,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(v) if v >= 0 => v,
                _ => {
                    warn!("Invalid advance booking days setting '{}', using default", raw);
                    defaults.advance_booking_days
                }
            },
        };

        Ok(SchedulingSettings { slot_interval_minutes, business_hours, advance_booking_days })
    }
}
