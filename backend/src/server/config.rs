//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use timers_backend::inbound::http::session_config::SessionSettings;
use timers_backend::inbound::ws::OriginPolicy;

use super::settings::{ServerSettings, SettingsError};

/// Everything needed to build and run the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) broadcast_interval: Duration,
    pub(crate) origins: OriginPolicy,
}

impl ServerConfig {
    /// Construct a server configuration from session and listener settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            broadcast_interval: Duration::from_secs(1),
            origins: OriginPolicy::new("localhost"),
        }
    }

    /// Combine session settings with the loaded [`ServerSettings`].
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the bind address does not parse.
    pub fn from_settings(
        session: SessionSettings,
        settings: &ServerSettings,
    ) -> Result<Self, SettingsError> {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Ok(
            Self::new(key, cookie_secure, same_site, settings.bind_addr()?)
                .with_broadcast_interval(settings.broadcast_interval())
                .with_origins(OriginPolicy::new(settings.ws_allowed_host())),
        )
    }

    /// Set the period between timer broadcasts.
    #[must_use]
    pub fn with_broadcast_interval(mut self, interval: Duration) -> Self {
        self.broadcast_interval = interval;
        self
    }

    /// Set the WebSocket origin allow-list.
    #[must_use]
    pub fn with_origins(mut self, origins: OriginPolicy) -> Self {
        self.origins = origins;
        self
    }
}
