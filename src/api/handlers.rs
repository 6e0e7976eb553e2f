//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tracing::{info, warn};

use super::responses::{ApiError, ApiResponse, HealthResponse, StatusResponse};
use crate::{
    observer::{validate_duration, InputError, TimeSelection},
    preferences::{Preferences, PreferencesUpdate},
    state::{AlertSettings, AppState, SettingsUpdate},
    utils::format_remaining,
};

/// Body of `POST /countdown/start`.
///
/// Either `seconds` alone (total duration) or any of `hours`/`minutes` with
/// `seconds` as the time picker's seconds column. Either way the total is
/// capped at 23:59:59.
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub seconds: Option<u64>,
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub vibration: Option<bool>,
    pub alarm: Option<bool>,
}

impl StartRequest {
    pub fn duration(&self) -> Result<u64, InputError> {
        if self.hours.is_none() && self.minutes.is_none() {
            return validate_duration(self.seconds.unwrap_or(0));
        }

        let selection = TimeSelection {
            hours: self.hours.unwrap_or(0),
            minutes: self.minutes.unwrap_or(0),
            seconds: u32::try_from(self.seconds.unwrap_or(0)).unwrap_or(u32::MAX),
        };
        selection.to_duration()
    }

    pub fn settings(&self) -> AlertSettings {
        let defaults = AlertSettings::default();
        AlertSettings::new(
            self.vibration.unwrap_or(defaults.vibration),
            self.alarm.unwrap_or(defaults.alarm_sound),
        )
    }
}

/// Handle POST /countdown/start - Start or restart a countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let seconds = request.duration().map_err(|e| {
        warn!("Rejected countdown start: {}", e);
        e
    })?;
    let settings = request.settings();

    state
        .engine
        .start(seconds, settings.vibration, settings.alarm_sound)
        .await?;
    state.record_command("start");
    info!("Start endpoint called - countdown of {}s started", seconds);

    Ok(Json(ApiResponse::new(
        format!("Countdown started for {}", format_remaining(seconds)),
        state.engine.snapshot(),
    )))
}

/// Handle POST /countdown/stop - Stop the countdown and silence alerts
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    state.engine.stop().await?;
    state.record_command("stop");
    info!("Stop endpoint called - countdown stopped");

    Ok(Json(ApiResponse::new(
        "Countdown stopped".to_string(),
        state.engine.snapshot(),
    )))
}

/// Handle POST /countdown/settings - Update alert settings
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ApiResponse>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "settings update must set vibration or alarm".to_string(),
        ));
    }

    let countdown = state.engine.update_settings(update).await?;
    state.record_command("settings");
    info!(
        "Settings endpoint called - vibration={}, alarm={}",
        countdown.vibration_enabled, countdown.alarm_sound_enabled
    );

    Ok(Json(ApiResponse::new("Settings updated".to_string(), countdown)))
}

/// Handle GET /countdown/status - Return the current countdown snapshot
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let countdown = state.engine.snapshot();
    let (last_command, last_command_time) = state.get_last_command();

    Json(StatusResponse {
        remaining: countdown.formatted_remaining(),
        countdown,
        observers: state.engine.observer_count(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_command,
        last_command_time,
    })
}

/// Handle GET /countdown/events - Stream every published state as SSE.
///
/// Each open stream is one attached observer; closing it detaches.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let updates = state.engine.subscribe();
    info!("Observer attached via event stream ({} attached)", state.engine.observer_count());

    let events = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }
        let snapshot = updates.borrow_and_update().clone();
        let event = Event::default().event("countdown").json_data(&snapshot);
        Some((event, (updates, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /preferences
pub async fn get_preferences_handler(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    Json(state.preferences.get().await)
}

/// Handle PUT /preferences - Partially update and persist preferences
pub async fn update_preferences_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>, ApiError> {
    let preferences = state.preferences.update(update).await?;
    state.record_command("preferences");
    Ok(Json(preferences))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
