use serde::Serialize;

/// Slot grid for one provider and date. `all_slots` is the in-hours subset;
/// every entry is in exactly one of `available_slots` / `booked_slots`.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct SlotClassification {
    pub all_slots: Vec<String>,
    pub available_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}
