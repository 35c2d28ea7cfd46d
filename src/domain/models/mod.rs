pub mod availability;
pub mod booking;
pub mod service;
pub mod setting;
pub mod slot;
