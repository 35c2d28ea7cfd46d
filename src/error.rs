use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Date not available: {0}")]
    Unavailable(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Cannot book in the past")]
    PastBooking,
    #[error("Booking is more than {max_days} days in advance")]
    AdvanceWindow { max_days: i64 },
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier the UI uses to pick the corrective action.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "persistence",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Unavailable(_) => "date_unavailable",
            AppError::Conflict(_) => "conflict",
            AppError::PastBooking => "past_booking",
            AppError::AdvanceWindow { .. } => "advance_window",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)", "kind": "conflict" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Could not save the booking. Please try again.".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unavailable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::PastBooking => (StatusCode::UNPROCESSABLE_ENTITY, "Cannot book a date in the past".to_string()),
            AppError::AdvanceWindow { max_days } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Bookings can be made at most {} days in advance", max_days),
            ),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
