//! Countdown Timer - A background countdown engine with alerts
//!
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    api::create_router,
    config::Config,
    engine::CountdownEngine,
    preferences::PreferencesStore,
    services::{check_peripheral_commands, Peripherals},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, wake_lock_margin={}s, preferences={}",
        config.host,
        config.port,
        config.wake_lock_margin,
        config.preferences.display()
    );

    // Alerts are best-effort, so missing host tools only downgrade them
    let peripherals = if config.no_system_peripherals {
        info!("Using log-only peripherals");
        Peripherals::log_only()
    } else {
        check_peripheral_commands().await;
        Peripherals::system(config.alarm_sound.clone())
    };

    // Start the countdown engine
    let (engine, engine_task) = CountdownEngine::spawn(config.engine_config(), peripherals);

    let preferences = PreferencesStore::load(config.preferences.clone()).await;
    let state = Arc::new(AppState::new(
        engine.clone(),
        preferences,
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /countdown/start    - Start or restart a countdown");
    info!("  POST /countdown/stop     - Stop the countdown and silence alerts");
    info!("  POST /countdown/settings - Update vibration/alarm settings");
    info!("  GET  /countdown/status   - Current countdown snapshot");
    info!("  GET  /countdown/events   - Server-sent countdown updates");
    info!("  GET  /preferences        - Read preferences");
    info!("  PUT  /preferences        - Update preferences");
    info!("  GET  /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    engine.shutdown().await?;
    engine_task.await?;

    info!("Server shutdown complete");
    Ok(())
}
