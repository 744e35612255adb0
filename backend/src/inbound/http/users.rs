//! Account handlers: signup, login and logout.
//!
//! ```text
//! POST /api/v1/signup {"name":"ada","password":"hunter2"}
//! POST /api/v1/login  {"username":"ada","password":"hunter2"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError, UserId, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "ada")]
    pub name: String,
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada")]
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Identifier of the user a session belongs to.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserIdResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
}

impl From<&UserId> for UserIdResponse {
    fn from(value: &UserId) -> Self {
        Self {
            user_id: value.to_string(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError, username_field: &str) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": username_field, "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "password", "code": "empty_password" })),
        LoginValidationError::PasswordTooLong { max } => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "password", "code": "password_too_long", "max": max })),
    }
}

fn map_display_name_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "name", "code": "invalid_display_name" }))
}

/// Register an account and start a session for it.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = UserIdResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<web::Json<UserIdResponse>> {
    let SignupRequest { name, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&name, &password)
        .map_err(|err| map_login_validation_error(err, "name"))?;
    let display_name = credentials
        .display_name()
        .map_err(map_display_name_error)?;

    let user_id = state.signup.register(&display_name, &credentials).await?;
    session.persist_user(&user_id)?;
    Ok(web::Json(UserIdResponse::from(&user_id)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserIdResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Incorrect password", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserIdResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(err, "username"))?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    info!(user_id = %user_id, "user logged in");
    Ok(web::Json(UserIdResponse::from(&user_id)))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.forget_user();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests;
