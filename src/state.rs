use std::sync::Arc;
use crate::domain::ports::{AvailabilityRepository, BookingRepository, ServiceRepository, SettingsRepository};
use crate::domain::services::scheduler::BookingScheduler;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub scheduler: Arc<BookingScheduler>,
}
