//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    engine::EngineError,
    observer::InputError,
    preferences::PreferencesError,
    state::{CountdownState, Phase},
};

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownState,
}

impl ApiResponse {
    /// Create a response whose status mirrors the countdown phase
    pub fn new(message: String, countdown: CountdownState) -> Self {
        let status = match countdown.phase {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Finished => "finished",
        };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            countdown,
        }
    }
}

/// Status response with formatted time and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownState,
    pub remaining: String,
    pub observers: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_command: Option<String>,
    pub last_command_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Handler failure mapped to an HTTP status
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        };
        (code, Json(body)).into_response()
    }
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        error!("Engine command failed: {}", e);
        ApiError::Unavailable(e.to_string())
    }
}

impl From<PreferencesError> for ApiError {
    fn from(e: PreferencesError) -> Self {
        error!("Preferences update failed: {}", e);
        ApiError::Internal(e.to_string())
    }
}
