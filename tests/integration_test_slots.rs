mod common;

use axum::http::StatusCode;
use common::{strings, TestApp, NEXT_MONDAY, PROVIDER};

fn monday_grid() -> Vec<String> {
    (9..=17)
        .flat_map(|h| if h == 17 { vec![format!("{:02}:00", h)] } else { vec![format!("{:02}:00", h), format!("{:02}:30", h)] })
        .collect()
}

#[tokio::test]
async fn test_monday_grid_with_no_bookings() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;

    let body = app.slots(PROVIDER, NEXT_MONDAY).await;

    assert_eq!(body["date"], NEXT_MONDAY);
    assert_eq!(body["date_available"], true);
    assert_eq!(strings(&body["all_slots"]), monday_grid());
    assert_eq!(strings(&body["all_slots"]).len(), 17);
    assert_eq!(strings(&body["available_slots"]), monday_grid());
    assert!(strings(&body["booked_slots"]).is_empty());
}

#[tokio::test]
async fn test_day_without_windows_is_unavailable() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;

    // Tuesday has no window.
    let body = app.slots(PROVIDER, "2026-10-20").await;

    assert_eq!(body["date_available"], false);
    assert!(strings(&body["all_slots"]).is_empty());
    assert!(strings(&body["available_slots"]).is_empty());
    assert!(strings(&body["booked_slots"]).is_empty());
}

#[tokio::test]
async fn test_existing_booking_marks_covered_slots() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    let service = app.seed_service(60, &[PROVIDER]).await;

    let (status, _) = app.book(&service, NEXT_MONDAY, "10:00", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let body = app.slots(PROVIDER, NEXT_MONDAY).await;
    let available = strings(&body["available_slots"]);

    assert_eq!(strings(&body["booked_slots"]), vec!["10:00", "10:30"]);
    assert!(!available.contains(&"10:00".to_string()));
    assert!(!available.contains(&"10:30".to_string()));
    assert!(available.contains(&"09:30".to_string()));
    assert!(available.contains(&"11:00".to_string()));
    assert_eq!(available.len() + 2, strings(&body["all_slots"]).len());
}

#[tokio::test]
async fn test_date_specific_window_replaces_weekday_pattern() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    app.seed_date_window(PROVIDER, NEXT_MONDAY, "13:00", "15:00", true).await;

    let body = app.slots(PROVIDER, NEXT_MONDAY).await;
    assert_eq!(strings(&body["all_slots"]), vec!["13:00", "13:30", "14:00", "14:30", "15:00"]);

    // The following Monday still uses the weekly pattern.
    let body = app.slots(PROVIDER, "2026-10-26").await;
    assert_eq!(strings(&body["all_slots"]).len(), 17);
}

#[tokio::test]
async fn test_unavailable_date_entry_blocks_the_day() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    app.seed_date_window(PROVIDER, NEXT_MONDAY, "09:00", "17:00", false).await;

    let body = app.slots(PROVIDER, NEXT_MONDAY).await;
    assert_eq!(body["date_available"], false);
}

#[tokio::test]
async fn test_slot_interval_setting_changes_the_grid() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    app.set_setting("booking", "bookingTimeSlotInterval", "60").await;

    let body = app.slots(PROVIDER, NEXT_MONDAY).await;
    assert_eq!(strings(&body["all_slots"]).len(), 9);
    assert_eq!(strings(&body["all_slots"])[0], "09:00");
}

#[tokio::test]
async fn test_business_hours_clip_the_window() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "07:00", "20:00").await;
    app.set_setting("system", "businessHours", "10:00-12:00").await;

    let body = app.slots(PROVIDER, NEXT_MONDAY).await;
    assert_eq!(strings(&body["all_slots"]), vec!["10:00", "10:30", "11:00", "11:30", "12:00"]);
}

#[tokio::test]
async fn test_exclude_booking_frees_its_own_slots() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    let service = app.seed_service(60, &[PROVIDER]).await;

    let (_, booking) = app.book(&service, NEXT_MONDAY, "10:00", None).await;
    let id = booking["id"].as_str().unwrap();

    let (status, body) = app.get_json(&format!(
        "/api/v1/providers/{}/slots?date={}&exclude_booking_id={}", PROVIDER, NEXT_MONDAY, id
    )).await;

    assert_eq!(status, StatusCode::OK);
    assert!(strings(&body["booked_slots"]).is_empty());
}

#[tokio::test]
async fn test_malformed_date_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json(&format!("/api/v1/providers/{}/slots?date=19-10-2026", PROVIDER)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}
