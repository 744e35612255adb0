//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (users, timers,
//!   health)
//! - **Schemas**: wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) that
//!   describe domain types without coupling them to utoipa, plus the request
//!   and response bodies
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling. The
//! WebSocket endpoint is not described here.

use crate::inbound::TimerViewPayload;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorDetailCodeSchema, ErrorDetailsSchema, ErrorSchema,
};
use crate::inbound::http::timers::{StartTimerBody, StartTimerResponseBody, StopTimerResponseBody};
use crate::inbound::http::users::{LoginRequest, SignupRequest, UserIdResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/signup or POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Timers backend API",
        description = "Session-authenticated timer lifecycle endpoints and health checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::timers::start_timer,
        crate::inbound::http::timers::stop_timer,
        crate::inbound::http::timers::list_timers,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorDetailsSchema,
        ErrorDetailCodeSchema,
        TimerViewPayload,
        SignupRequest,
        LoginRequest,
        UserIdResponse,
        StartTimerBody,
        StartTimerResponseBody,
        StopTimerResponseBody
    )),
    tags(
        (name = "users", description = "Signup and session management"),
        (name = "timers", description = "Named timer lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
