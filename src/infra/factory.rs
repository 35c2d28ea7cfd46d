use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{
    AvailabilityRepository, BookingRepository, Clock, ServiceRepository, SettingsRepository, SystemClock,
};
use crate::domain::services::{
    scheduler::{BookingScheduler, SchedulerPolicy},
    settings::SettingsResolver,
};
use crate::infra::repositories::{
    postgres_availability_repo::PostgresAvailabilityRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_service_repo::PostgresServiceRepo, postgres_settings_repo::PostgresSettingsRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_service_repo::SqliteServiceRepo, sqlite_settings_repo::SqliteSettingsRepo,
};

pub struct Repositories {
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
}

impl Repositories {
    pub fn sqlite(pool: &SqlitePool) -> Self {
        Self {
            settings_repo: Arc::new(SqliteSettingsRepo::new(pool.clone())),
            availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
        }
    }

    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            settings_repo: Arc::new(PostgresSettingsRepo::new(pool.clone())),
            availability_repo: Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            service_repo: Arc::new(PostgresServiceRepo::new(pool.clone())),
        }
    }
}

/// Wires repositories and the scheduler into an `AppState`. Tests pass their own clock.
pub fn assemble_state(config: &Config, repos: Repositories, clock: Arc<dyn Clock>) -> AppState {
    let scheduler = BookingScheduler::new(
        SettingsResolver::new(repos.settings_repo.clone()),
        repos.availability_repo.clone(),
        repos.booking_repo.clone(),
        repos.service_repo.clone(),
        clock,
        config.business_timezone,
        SchedulerPolicy::from_config(config),
    );

    AppState {
        config: config.clone(),
        settings_repo: repos.settings_repo,
        availability_repo: repos.availability_repo,
        booking_repo: repos.booking_repo,
        service_repo: repos.service_repo,
        scheduler: Arc::new(scheduler),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        Repositories::postgres(&pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        Repositories::sqlite(&pool)
    };

    info!("Business clock runs on {}", config.business_timezone);
    assemble_state(config, repos, Arc::new(SystemClock))
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
