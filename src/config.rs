use std::env;
use std::str::FromStr;

use chrono_tz::Tz;

/// How follow-up occurrences of a recurring booking are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrencePolicy {
    /// Only the first occurrence is validated; later clashes are left to staff.
    BestEffort,
    /// Every occurrence is validated, failing ones are skipped and reported.
    Strict,
}

impl FromStr for RecurrencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(RecurrencePolicy::BestEffort),
            "strict" => Ok(RecurrencePolicy::Strict),
            other => Err(format!("unknown recurrence policy '{}'", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub business_timezone: Tz,
    pub recurrence_policy: RecurrencePolicy,
    pub skip_conflicts_for_unassigned_services: bool,
    pub max_recurring_count: i32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            business_timezone: env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "UTC".to_string())
                .parse().expect("BUSINESS_TIMEZONE must be an IANA timezone name"),
            recurrence_policy: env::var("RECURRENCE_POLICY").unwrap_or_else(|_| "best_effort".to_string())
                .parse().expect("RECURRENCE_POLICY must be 'best_effort' or 'strict'"),
            skip_conflicts_for_unassigned_services: env::var("SKIP_CONFLICTS_FOR_UNASSIGNED_SERVICES")
                .unwrap_or_else(|_| "true".to_string())
                .parse().expect("SKIP_CONFLICTS_FOR_UNASSIGNED_SERVICES must be true or false"),
            max_recurring_count: env::var("MAX_RECURRING_COUNT").unwrap_or_else(|_| "52".to_string())
                .parse().expect("MAX_RECURRING_COUNT must be a number"),
        }
    }
}
