//! Server settings loaded via OrthoConfig.
//!
//! Values come from `TIMERS_*` environment variables, command-line flags, or
//! a configuration file; anything left unset takes the field defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const MIN_BROADCAST_INTERVAL_MS: u64 = 50;
const DEFAULT_WS_ALLOWED_HOST: &str = "localhost";

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_owned()
}

fn default_ws_allowed_host() -> String {
    DEFAULT_WS_ALLOWED_HOST.to_owned()
}

/// Settings that shape the listener, broadcaster, and WebSocket origins.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TIMERS")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: String,
    /// Period between timer broadcasts, in milliseconds.
    #[ortho_config(default = 1_000)]
    pub broadcast_interval_ms: u64,
    /// Host whose HTTPS origins may open WebSockets.
    #[ortho_config(default = default_ws_allowed_host())]
    pub ws_allowed_host: String,
}

/// Rejected server settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl ServerSettings {
    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .trim()
            .parse()
            .map_err(|source| SettingsError::BindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Broadcast period, never shorter than 50ms.
    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.broadcast_interval_ms.max(MIN_BROADCAST_INTERVAL_MS))
    }

    /// Host used for the WebSocket origin allow-list.
    ///
    /// A blank value means `localhost`.
    pub fn ws_allowed_host(&self) -> &str {
        match self.ws_allowed_host.trim() {
            "" => DEFAULT_WS_ALLOWED_HOST,
            host => host,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 3] = [
        "TIMERS_BIND_ADDR",
        "TIMERS_BROADCAST_INTERVAL_MS",
        "TIMERS_WS_ALLOWED_HOST",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("timers-backend")])
            .expect("config should load")
    }

    fn defaults() -> ServerSettings {
        ServerSettings {
            bind_addr: default_bind_addr(),
            broadcast_interval_ms: 1_000,
            ws_allowed_host: default_ws_allowed_host(),
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.broadcast_interval_ms, 1_000);
        assert_eq!(settings.ws_allowed_host, "localhost");
        assert_eq!(
            settings.bind_addr().expect("default bind addr"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(settings.broadcast_interval(), Duration::from_secs(1));
        assert_eq!(settings.ws_allowed_host(), "localhost");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TIMERS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("TIMERS_BROADCAST_INTERVAL_MS", Some("250".to_owned())),
            ("TIMERS_WS_ALLOWED_HOST", Some("timers.example".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(settings.broadcast_interval(), Duration::from_millis(250));
        assert_eq!(settings.ws_allowed_host(), "timers.example");
    }

    #[rstest]
    #[case(0, Duration::from_millis(50))]
    #[case(10, Duration::from_millis(50))]
    #[case(50, Duration::from_millis(50))]
    #[case(1_000, Duration::from_millis(1_000))]
    fn broadcast_interval_has_a_floor(#[case] millis: u64, #[case] expected: Duration) {
        let settings = ServerSettings {
            broadcast_interval_ms: millis,
            ..defaults()
        };
        assert_eq!(settings.broadcast_interval(), expected);
    }

    #[rstest]
    fn single_override_keeps_other_defaults() {
        let _guard = lock_env([
            ("TIMERS_BIND_ADDR", None),
            ("TIMERS_BROADCAST_INTERVAL_MS", Some("250".to_owned())),
            ("TIMERS_WS_ALLOWED_HOST", None),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.broadcast_interval(), Duration::from_millis(250));
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.ws_allowed_host(), "localhost");
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let settings = ServerSettings {
            bind_addr: "not-an-addr".to_owned(),
            ..defaults()
        };
        let error = settings.bind_addr().expect_err("bind addr should fail");
        assert!(error.to_string().contains("not-an-addr"));
    }

    #[rstest]
    fn blank_allowed_host_falls_back_to_default() {
        let settings = ServerSettings {
            ws_allowed_host: "   ".to_owned(),
            ..defaults()
        };
        assert_eq!(settings.ws_allowed_host(), "localhost");
    }
}
