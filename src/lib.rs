pub mod api;
pub mod clock;
pub mod db;
pub mod settings;
mod folders;
mod tasks;
pub mod timer;
pub mod validation;

use std::sync::Arc;

use anyhow::Context;
use log::{error, info};
use tokio::net::TcpListener;

pub use api::create_router;
use clock::{Clock, SystemClock};
use db::Database;
use settings::Settings;
use timer::TimerController;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub timer: TimerController,
}

impl AppState {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        let timer = TimerController::new(Arc::new(db.clone()), clock);
        Self { db, timer }
    }
}

fn init_logging(settings: &Settings) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(settings.log_level());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_logging(&settings);

    info!("time2learn starting up...");

    let database = match Database::new(settings.database_path.clone()) {
        Ok(database) => database,
        Err(err) => {
            error!("Record store unavailable at startup: {err:#}");
            return Err(err);
        }
    };

    let state = AppState::new(database.clone(), Arc::new(SystemClock));
    let app = create_router(state);

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!("Listening on {}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    database.close();
    Ok(())
}
