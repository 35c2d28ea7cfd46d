use crate::domain::models::slot::SlotClassification;
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub date_available: bool,
    pub all_slots: Vec<String>,
    pub available_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}

impl SlotsResponse {
    pub fn available(date: String, slots: SlotClassification) -> Self {
        Self {
            date,
            date_available: true,
            all_slots: slots.all_slots,
            available_slots: slots.available_slots,
            booked_slots: slots.booked_slots,
        }
    }

    pub fn unavailable(date: String) -> Self {
        Self {
            date,
            date_available: false,
            all_slots: Vec::new(),
            available_slots: Vec::new(),
            booked_slots: Vec::new(),
        }
    }
}
