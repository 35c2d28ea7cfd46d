#![allow(dead_code)]

use booking_scheduler::{
    api::router::create_router,
    config::{Config, RecurrencePolicy},
    domain::models::{
        availability::{AvailabilityWindow, NewWindowParams},
        service::Service,
        setting::Setting,
    },
    domain::ports::Clock,
    infra::factory::{assemble_state, Repositories},
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const PROVIDER: &str = "provider-1";

/// Monday 2026-10-12 08:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 12, 8, 0, 0).unwrap()
}

/// The Monday a week after `fixed_now`.
pub const NEXT_MONDAY: &str = "2026-10-19";

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_policy(policy: RecurrencePolicy) -> Self {
        Self::with_config(|c| c.recurrence_policy = policy).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut config = Config {
            database_url: db_url.clone(),
            port: 0,
            business_timezone: Tz::UTC,
            recurrence_policy: RecurrencePolicy::BestEffort,
            skip_conflicts_for_unassigned_services: true,
            max_recurring_count: 52,
        };
        customize(&mut config);

        let state = Arc::new(assemble_state(
            &config,
            Repositories::sqlite(&pool),
            Arc::new(FixedClock(fixed_now())),
        ));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn seed_service(&self, duration_minutes: i32, provider_ids: &[&str]) -> String {
        let service = Service::new(
            "Consultation".to_string(),
            duration_minutes,
            provider_ids.iter().map(|p| p.to_string()).collect(),
        );
        self.state.service_repo.create(&service).await.unwrap().id
    }

    /// A weekly window; `day_of_week` counts from Sunday = 0.
    pub async fn seed_weekly_window(&self, provider_id: &str, day_of_week: i32, start: &str, end: &str) -> String {
        let window = AvailabilityWindow::new(NewWindowParams {
            provider_id: provider_id.to_string(),
            date: None,
            day_of_week: Some(day_of_week),
            start_time: time(start),
            end_time: time(end),
            is_available: true,
            location: None,
        });
        self.state.availability_repo.create(&window).await.unwrap().id
    }

    pub async fn seed_date_window(&self, provider_id: &str, date: &str, start: &str, end: &str, is_available: bool) -> String {
        let window = AvailabilityWindow::new(NewWindowParams {
            provider_id: provider_id.to_string(),
            date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            day_of_week: None,
            start_time: time(start),
            end_time: time(end),
            is_available,
            location: None,
        });
        self.state.availability_repo.create(&window).await.unwrap().id
    }

    pub async fn set_setting(&self, category: &str, key: &str, value: &str) {
        self.state.settings_repo.upsert(&Setting::new(category, key, value)).await.unwrap();
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
        ).await.unwrap();
        into_parts(response).await
    }

    pub async fn send_json(&self, method: &str, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();
        into_parts(response).await
    }

    pub async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, payload).await
    }

    pub async fn slots(&self, provider_id: &str, date: &str) -> Value {
        let (status, body) = self.get_json(&format!("/api/v1/providers/{}/slots?date={}", provider_id, date)).await;
        assert_eq!(status, StatusCode::OK, "slots request failed: {}", body);
        body
    }

    pub async fn book(&self, service_id: &str, date: &str, time: &str, duration: Option<i32>) -> (StatusCode, Value) {
        self.post_json("/api/v1/bookings", serde_json::json!({
            "customer_id": "customer-1",
            "provider_id": PROVIDER,
            "service_id": service_id,
            "date": date,
            "time": time,
            "duration_minutes": duration,
        })).await
    }
}

fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap()
}

async fn into_parts(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

pub fn strings(value: &Value) -> Vec<String> {
    value.as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
