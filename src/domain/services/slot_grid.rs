use chrono::NaiveTime;

/// Candidate time-of-day slots: every hour from `start_hour` to `end_hour`
/// inclusive, with minutes `0, interval, 2*interval, ..` below 60. The last
/// hour only contributes `end_hour:00`.
pub fn build_slot_grid(start_hour: u32, end_hour: u32, interval_minutes: i32) -> Vec<NaiveTime> {
    if interval_minutes <= 0 || start_hour > end_hour {
        return Vec::new();
    }

    let end_hour = end_hour.min(23);
    let mut slots = Vec::new();

    for hour in start_hour..=end_hour {
        let mut minute = 0u32;
        while minute < 60 {
            if hour == end_hour && minute > 0 {
                break;
            }
            if let Some(t) = NaiveTime::from_hms_opt(hour, minute, 0) {
                slots.push(t);
            }
            minute += interval_minutes as u32;
        }
    }

    slots
}

pub fn format_slot(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(slots: &[NaiveTime]) -> Vec<String> {
        slots.iter().map(|t| format_slot(*t)).collect()
    }

    #[test]
    fn test_business_day_half_hour_grid() {
        let grid = build_slot_grid(9, 17, 30);
        let l = labels(&grid);
        assert_eq!(l.first().unwrap(), "09:00");
        assert_eq!(l[1], "09:30");
        assert_eq!(l.last().unwrap(), "17:00");
        assert!(!l.contains(&"17:30".to_string()));
        assert_eq!(grid.len(), 17);
    }

    #[test]
    fn test_grid_is_strictly_increasing_and_counted() {
        for interval in [5, 10, 15, 20, 30, 60] {
            for (start, end) in [(0, 23), (9, 17), (8, 8), (12, 13)] {
                let grid = build_slot_grid(start, end, interval);
                assert!(grid.windows(2).all(|w| w[0] < w[1]), "interval {} not increasing", interval);
                let expected = (end - start) as usize * (60 / interval as usize) + 1;
                assert_eq!(grid.len(), expected, "interval {} range {}-{}", interval, start, end);
            }
        }
    }

    #[test]
    fn test_interval_longer_than_an_hour_keeps_whole_hours() {
        let grid = build_slot_grid(9, 12, 120);
        assert_eq!(labels(&grid), vec!["09:00", "10:00", "11:00", "12:00"]);
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        assert!(build_slot_grid(9, 17, 0).is_empty());
        assert!(build_slot_grid(9, 17, -15).is_empty());
        assert!(build_slot_grid(17, 9, 30).is_empty());
    }
}
