use crate::domain::models::{
    availability::AvailabilityWindow, booking::{Booking, BookingStatus},
    service::Service, setting::Setting,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, category: &str, key: &str) -> Result<Option<Setting>, AppError>;
    async fn upsert(&self, setting: &Setting) -> Result<Setting, AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create(&self, window: &AvailabilityWindow) -> Result<AvailabilityWindow, AppError>;
    /// Date-specific windows for `date` plus the weekday windows of its weekday.
    async fn windows_for(&self, provider_id: &str, date: NaiveDate) -> Result<Vec<AvailabilityWindow>, AppError>;
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<AvailabilityWindow>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Inserts all bookings in one transaction; either every row is written or none.
    async fn insert_batch(&self, bookings: &[Booking]) -> Result<Vec<Booking>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    /// Non-cancelled bookings of the provider overlapping `[start, end)`.
    async fn active_bookings_for(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    /// Writes the booking's time, location and notes. `None` when the booking
    /// is missing or already cancelled or completed; the status is never written.
    async fn update(&self, booking: &Booking) -> Result<Option<Booking>, AppError>;
    /// Moves the status from `from` to `to`; `None` if the stored status is no longer `from`.
    async fn update_status(&self, id: &str, from: BookingStatus, to: BookingStatus) -> Result<Option<Booking>, AppError>;
    async fn list_by_recurring_parent(&self, parent_id: &str) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
