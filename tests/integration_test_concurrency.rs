mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use booking_scheduler::{
    domain::models::{booking::BookingStatus, service::Service},
    domain::ports::{BookingRepository, ServiceRepository},
    error::AppError,
    infra::factory::{assemble_state, Repositories},
};
use chrono::NaiveDate;
use common::{fixed_now, FixedClock, TestApp, NEXT_MONDAY, PROVIDER};
use std::sync::{Arc, Mutex};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_placements_for_one_slot_yield_one_booking() {
    let app = Arc::new(TestApp::new().await);
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    let service = app.seed_service(60, &[PROVIDER]).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            app.book(&service, NEXT_MONDAY, "10:00", None).await.0
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status != 'cancelled'")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_providers_book_in_parallel() {
    let app = Arc::new(TestApp::new().await);
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    app.seed_weekly_window("provider-2", 1, "09:00", "17:00").await;
    let service = app.seed_service(60, &[PROVIDER, "provider-2"]).await;

    let first = {
        let app = app.clone();
        let service = service.clone();
        tokio::spawn(async move { app.book(&service, NEXT_MONDAY, "10:00", None).await.0 })
    };
    let second = {
        let app = app.clone();
        tokio::spawn(async move {
            app.post_json("/api/v1/bookings", serde_json::json!({
                "customer_id": "customer-2",
                "provider_id": "provider-2",
                "service_id": service,
                "date": NEXT_MONDAY,
                "time": "10:00",
            })).await.0
        })
    };

    assert_eq!(first.await.unwrap(), StatusCode::CREATED);
    assert_eq!(second.await.unwrap(), StatusCode::CREATED);
}

/// Cancels `target` the first time a service is looked up, standing in for a
/// cancellation that lands while a reschedule is in flight.
struct CancelOnLookup {
    inner: Arc<dyn ServiceRepository>,
    bookings: Arc<dyn BookingRepository>,
    target: Mutex<Option<String>>,
}

#[async_trait]
impl ServiceRepository for CancelOnLookup {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        self.inner.create(service).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        let target = self.target.lock().unwrap().take();
        if let Some(booking_id) = target {
            self.bookings.update_status(&booking_id, BookingStatus::Pending, BookingStatus::Cancelled).await?;
        }
        self.inner.find_by_id(id).await
    }
}

#[tokio::test]
async fn test_reschedule_does_not_revive_booking_cancelled_mid_flight() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    let service = app.seed_service(60, &[PROVIDER]).await;
    let (status, booking) = app.book(&service, NEXT_MONDAY, "10:00", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let mut repos = Repositories::sqlite(&app.pool);
    let cancel = Arc::new(CancelOnLookup {
        inner: repos.service_repo.clone(),
        bookings: repos.booking_repo.clone(),
        target: Mutex::new(Some(booking_id.clone())),
    });
    repos.service_repo = cancel;
    let state = assemble_state(&app.state.config, repos, Arc::new(FixedClock(fixed_now())));

    let new_start = NaiveDate::parse_from_str(NEXT_MONDAY, "%Y-%m-%d").unwrap().and_hms_opt(13, 0, 0).unwrap();
    let err = state.scheduler.reschedule(&booking_id, new_start, None).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "unexpected error: {:?}", err);

    let stored = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert_eq!(stored.start_time.to_rfc3339(), "2026-10-19T10:00:00+00:00");
}

#[tokio::test]
async fn test_status_change_requires_the_expected_current_status() {
    let app = TestApp::new().await;
    app.seed_weekly_window(PROVIDER, 1, "09:00", "17:00").await;
    let service = app.seed_service(60, &[PROVIDER]).await;
    let (_, booking) = app.book(&service, NEXT_MONDAY, "10:00", None).await;
    let booking_id = booking["id"].as_str().unwrap();

    let repo = &app.state.booking_repo;
    let cancelled = repo.update_status(booking_id, BookingStatus::Pending, BookingStatus::Cancelled).await.unwrap();
    assert_eq!(cancelled.unwrap().status, BookingStatus::Cancelled);

    let stale = repo.update_status(booking_id, BookingStatus::Pending, BookingStatus::Confirmed).await.unwrap();
    assert!(stale.is_none());
    assert_eq!(repo.find_by_id(booking_id).await.unwrap().unwrap().status, BookingStatus::Cancelled);
}
