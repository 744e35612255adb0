//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;

use crate::domain::TimerService;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{InMemoryTimerRepository, InMemoryUserDirectory};
use crate::test_support::MutableClock;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over in-memory adapters and a clock the test controls.
pub fn in_memory_state(clock: Arc<MutableClock>) -> HttpState {
    let users = Arc::new(InMemoryUserDirectory::with_cost(crate::outbound::persistence::MIN_COST));
    let timers = Arc::new(TimerService::new(
        Arc::new(InMemoryTimerRepository::new()),
        clock,
    ));
    HttpState::new(users.clone(), users, timers.clone(), timers)
}

/// Extract the session cookie a response set.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Sign `name` up through `/api/v1/signup` and return the session cookie.
pub async fn signup_cookie<S>(app: &S, name: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/signup")
        .set_json(serde_json::json!({ "name": name, "password": "hunter22" }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "signup failed: {}", response.status());
    session_cookie(&response)
}
