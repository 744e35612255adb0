//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::ServerSettings;

use state_builders::{AppStates, build_states};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tokio::task::JoinHandle;
use tracing::info;

use timers_backend::Trace;
#[cfg(debug_assertions)]
use timers_backend::doc::ApiDoc;
use timers_backend::inbound::http::health::{HealthState, live, ready};
use timers_backend::inbound::http::state::HttpState;
use timers_backend::inbound::http::timers::{list_timers, start_timer, stop_timer};
use timers_backend::inbound::http::users::{login, logout, signup};
use timers_backend::inbound::ws;
use timers_backend::inbound::ws::state::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .service(signup)
        .service(login)
        .service(logout)
        .service(start_timer)
        .service(stop_timer)
        .service(list_timers);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// A bound server together with its background broadcaster.
pub struct RunningServer {
    pub server: Server,
    pub broadcaster: JoinHandle<()>,
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Binds the listener, starts the periodic timer broadcaster on the current
/// runtime, and marks the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<RunningServer> {
    let server_health_state = health_state.clone();
    let AppStates {
        http_state,
        ws_state,
        timers_query,
        broadcaster,
    } = build_states(&config, Arc::new(DefaultClock));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        broadcast_interval,
        origins,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    let broadcaster = broadcaster.spawn(timers_query, broadcast_interval);
    info!(
        %bind_addr,
        interval_ms = broadcast_interval.as_millis(),
        ws_allowed_host = origins.host(),
        "timers backend listening"
    );

    health_state.mark_ready();
    Ok(RunningServer {
        server,
        broadcaster,
    })
}
