use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use crate::domain::models::availability::AvailabilityWindow;

/// An absolute stretch of bookable time on the business clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl AvailabilitySpan {
    /// Grid membership is closed on both ends so a 09:00-17:00 window still lists 17:00.
    pub fn contains_slot(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn covers(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.start <= from && to <= self.end
    }
}

/// Picks the windows that govern `date`. Date-specific windows replace the
/// weekday pattern entirely, so an unavailable date-specific entry blocks the day.
pub fn resolve_windows<'a>(
    windows: &'a [AvailabilityWindow],
    date: NaiveDate,
    location: Option<&str>,
) -> Vec<&'a AvailabilityWindow> {
    let for_date: Vec<&AvailabilityWindow> = windows.iter().filter(|w| w.matches_date(date)).collect();
    let has_date_specific = for_date.iter().any(|w| w.is_date_specific());

    for_date
        .into_iter()
        .filter(|w| w.is_date_specific() == has_date_specific)
        .filter(|w| w.is_available)
        .filter(|w| w.applies_to_location(location))
        .collect()
}

pub fn availability_spans(
    windows: &[AvailabilityWindow],
    date: NaiveDate,
    location: Option<&str>,
) -> Vec<AvailabilitySpan> {
    let mut spans: Vec<AvailabilitySpan> = resolve_windows(windows, date, location)
        .into_iter()
        .map(|w| {
            let (start, end) = w.bounds_on(date);
            AvailabilitySpan { start, end }
        })
        .collect();
    spans.sort_by_key(|s| s.start);
    merge_adjacent(spans)
}

/// Joins touching or overlapping spans so a booking may straddle 12:00 across
/// `09:00-12:00` and `12:00-17:00`.
fn merge_adjacent(spans: Vec<AvailabilitySpan>) -> Vec<AvailabilitySpan> {
    let mut merged: Vec<AvailabilitySpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                if span.end > last.end {
                    last.end = span.end;
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// The in-hours subset of the grid for `date`.
pub fn in_hours_slots(grid: &[NaiveTime], date: NaiveDate, spans: &[AvailabilitySpan]) -> Vec<NaiveTime> {
    grid.iter()
        .copied()
        .filter(|t| {
            let instant = date.and_time(*t);
            spans.iter().any(|s| s.contains_slot(instant))
        })
        .collect()
}
