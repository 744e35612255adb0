//! WebSocket inbound adapter for live timer state.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, then session cookie)
//! - spawn the per-connection loop that serves timer requests and relays
//!   broadcaster snapshots
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod state;

/// Origins allowed to open WebSockets.
///
/// Accepts HTTPS origins on the configured host or any of its subdomains,
/// and HTTP origins on `localhost` with a non-zero explicit port.
///
/// # Examples
/// ```
/// use timers_backend::inbound::ws::OriginPolicy;
/// use url::Url;
///
/// let policy = OriginPolicy::new("timers.example");
/// assert!(policy.allows(&Url::parse("https://app.timers.example").unwrap()));
/// assert!(!policy.allows(&Url::parse("https://timers.example.evil.com").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    host: String,
    subdomain_suffix: String,
}

const LOCALHOST: &str = "localhost";

impl OriginPolicy {
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into().trim().trim_end_matches('.').to_ascii_lowercase();
        let subdomain_suffix = format!(".{host}");
        Self {
            host,
            subdomain_suffix,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether a parsed Origin may open a WebSocket.
    pub fn allows(&self, origin: &Url) -> bool {
        let Some(host) = origin.host_str() else {
            return false;
        };

        match origin.scheme() {
            "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
            "https" if host == self.host => true,
            "https" => host.ends_with(&self.subdomain_suffix),
            _ => false,
        }
    }

    fn validate(&self, origin_header: &HeaderValue) -> actix_web::Result<()> {
        let origin_value = origin_header.to_str().map_err(|error| {
            error!(error = %error, "Failed to parse Origin header as string");
            actix_web::error::ErrorBadRequest("Invalid Origin header")
        })?;

        let origin = Url::parse(origin_value).map_err(|error| {
            error!(error = %error, "Failed to parse Origin header as URL");
            actix_web::error::ErrorBadRequest("Invalid Origin header")
        })?;

        if self.allows(&origin) {
            Ok(())
        } else {
            warn!(
                origin = origin_value,
                "Rejected WS upgrade due to disallowed Origin"
            );
            Err(actix_web::error::ErrorForbidden("Origin not allowed"))
        }
    }
}

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    state.origins.validate(origin_header)?;

    let caller = session.caller()?;

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;

    let updates = state.broadcaster.subscribe();
    actix_web::rt::spawn(session::handle_ws_session(
        session::WsPorts {
            timers: state.timers.clone(),
            timers_query: state.timers_query.clone(),
        },
        caller,
        updates,
        ws_session,
        messages,
    ));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header::HeaderValue};
    use rstest::{fixture, rstest};

    #[fixture]
    fn policy() -> OriginPolicy {
        OriginPolicy::new("timers.example")
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://timers.example")]
    #[case("https://app.timers.example")]
    fn accepts_configured_origins(policy: OriginPolicy, #[case] origin: &str) {
        assert!(policy.validate(&header(origin)).is_ok());
    }

    #[rstest]
    #[case("http://localhost")]
    #[case("https://example.com")]
    #[case("wss://timers.example")]
    fn rejects_disallowed_origins(policy: OriginPolicy, #[case] origin: &str) {
        let error = policy
            .validate(&header(origin))
            .expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[rstest]
    fn rejects_non_utf8_origin_header(policy: OriginPolicy) {
        let header = HeaderValue::from_bytes(&[0x80]).expect("opaque header value");
        let error = policy
            .validate(&header)
            .expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    fn rejects_unparsable_origin_header(policy: OriginPolicy) {
        let error = policy
            .validate(&HeaderValue::from_static("not a url"))
            .expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    #[case("http://localhost:4000", true)]
    #[case("http://localhost:0", false)]
    #[case("https://timers.example", true)]
    #[case("https://TIMERS.example", true)]
    #[case("https://deep.app.timers.example", true)]
    #[case("https://timers.example.evil.com", false)]
    #[case("https://eviltimers.example", false)]
    #[case("http://timers.example", false)]
    fn evaluates_allow_list(policy: OriginPolicy, #[case] origin: &str, #[case] expected: bool) {
        let parsed = Url::parse(origin).expect("url should parse");
        assert_eq!(policy.allows(&parsed), expected);
    }

    #[test]
    fn normalises_configured_host() {
        assert_eq!(OriginPolicy::new(" Timers.Example. ").host(), "timers.example");
    }
}
