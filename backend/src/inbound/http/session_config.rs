//! Cookie session settings read from the environment.
//!
//! Debug builds fall back to safe defaults (with a warning) when a toggle is
//! missing or malformed; release builds refuse to start instead.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroize;

pub(crate) const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
pub(crate) const SESSION_KEY_MIN_LEN: usize = 64;
/// Shortest master key `Key::derive_from` accepts.
const SESSION_KEY_FLOOR: usize = 32;
pub(crate) const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub(crate) const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerate defaults and warn about missing toggles.
    Debug,
    /// Require explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use timers_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use timers_backend::inbound::http::session_config::{session_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_COOKIE_SECURE" => Some("0".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug)?;
/// assert!(!settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_from_env(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = bool_from_env(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key_from_env(env, mode, allow_ephemeral)?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Truncated SHA-256 fingerprint of the key's signing half.
///
/// Lets operators tell keys apart in logs without exposing them.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Fall back to `fallback` in debug builds, fail with `error` otherwise.
fn lenient<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(error = %error, "session setting defaulted");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default_value: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return lenient(mode, default_value, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => lenient(
            mode,
            default_value,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return lenient(
            mode,
            default_same_site,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
        );
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => lenient(
            mode,
            default_same_site,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = match mode {
                BuildMode::Debug => SESSION_KEY_FLOOR,
                BuildMode::Release => SESSION_KEY_MIN_LEN,
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
