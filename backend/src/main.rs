//! Backend entry-point: loads configuration, starts the HTTP server and the
//! timer broadcaster, and serves until shutdown.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{RunningServer, ServerConfig, ServerSettings, create_server};
use timers_backend::inbound::http::health::HealthState;
use timers_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn load_config() -> std::io::Result<ServerConfig> {
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load server settings: {e}")))?;
    ServerConfig::from_settings(session, &settings).map_err(std::io::Error::other)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = load_config()?;
    let health_state = web::Data::new(HealthState::new());
    let RunningServer {
        server,
        broadcaster,
    } = create_server(health_state.clone(), config)?;

    let result = server.await;
    health_state.mark_unhealthy();
    broadcaster.abort();
    info!("timers backend stopped");
    result
}
