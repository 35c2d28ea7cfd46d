pub mod availability;
pub mod booking_time;
pub mod business_time;
pub mod conflict;
pub mod locks;
pub mod recurrence;
pub mod scheduler;
pub mod settings;
pub mod slot_grid;
