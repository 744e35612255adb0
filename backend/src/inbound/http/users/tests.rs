//! Tests for account handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockLoginService;
use crate::inbound::http::test_utils::{
    in_memory_state, session_cookie, signup_cookie, test_session_middleware,
};
use crate::test_support::MutableClock;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(signup)
                .service(login)
                .service(logout),
        )
}

fn default_state() -> HttpState {
    in_memory_state(Arc::new(MutableClock::at_millis(0)))
}

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

#[actix_web::test]
async fn signup_then_login_returns_the_same_user_id() {
    let app = actix_test::init_service(test_app(default_state())).await;

    let signup_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({ "name": "ada", "password": "hunter22" }))
            .to_request(),
    )
    .await;
    assert_eq!(signup_res.status(), StatusCode::OK);
    let _ = session_cookie(&signup_res);
    let created = read_json(signup_res).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: " ada ".into(),
                password: "hunter22".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let _ = session_cookie(&login_res);
    let logged_in = read_json(login_res).await;

    assert!(created.get("userId").and_then(Value::as_str).is_some());
    assert_eq!(created.get("userId"), logged_in.get("userId"));
}

#[actix_web::test]
async fn duplicate_signup_conflicts() {
    let app = actix_test::init_service(test_app(default_state())).await;
    signup_cookie(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({ "name": "ada", "password": "other-pass" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value = read_json(response).await;
    assert_eq!(value.get("code").and_then(Value::as_str), Some("conflict"));
}

#[rstest]
#[case(json!({ "name": "  ", "password": "pw" }), "name", "empty_username")]
#[case(json!({ "name": "ada", "password": "" }), "password", "empty_password")]
#[case(json!({ "name": "a$", "password": "pw" }), "name", "invalid_display_name")]
#[case(json!({ "name": "ada", "password": "x".repeat(73) }), "password", "password_too_long")]
#[actix_web::test]
async fn signup_rejects_invalid_payloads(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(default_state())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = read_json(response).await;
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    let details = value.get("details").expect("details present");
    assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
    assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
}

#[rstest]
#[case("ada", "wrong-pass", StatusCode::UNAUTHORIZED, "unauthorized")]
#[case("grace", "hunter22", StatusCode::NOT_FOUND, "not_found")]
#[actix_web::test]
async fn login_distinguishes_unknown_user_from_wrong_password(
    #[case] username: &str,
    #[case] password: &str,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(default_state())).await;
    signup_cookie(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), status);
    let value = read_json(response).await;
    assert_eq!(value.get("code").and_then(Value::as_str), Some(code));
}

#[actix_web::test]
async fn login_skips_the_port_for_blank_credentials() {
    let mut login_port = MockLoginService::new();
    login_port.expect_authenticate().times(0);
    let mut state = default_state();
    state.login = Arc::new(login_port);

    let app = actix_test::init_service(test_app(state)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: "   ".into(),
                password: "pw".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = read_json(response).await;
    assert_eq!(
        value.pointer("/details/field").and_then(Value::as_str),
        Some("username")
    );
}

#[actix_web::test]
async fn login_surfaces_port_errors() {
    let mut login_port = MockLoginService::new();
    login_port
        .expect_authenticate()
        .times(1)
        .return_once(|_| Err(Error::internal("directory offline")));
    let mut state = default_state();
    state.login = Arc::new(login_port);

    let app = actix_test::init_service(test_app(state)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: "ada".into(),
                password: "pw".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: Error = serde_json::from_value(read_json(response).await).expect("error JSON");
    assert_eq!(value.code(), ErrorCode::InternalError);
    assert_eq!(value.message(), "Internal server error");
}

#[actix_web::test]
async fn logout_expires_the_session_cookie() {
    let app = actix_test::init_service(test_app(default_state())).await;
    let cookie = signup_cookie(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let expired = session_cookie(&response);
    assert_eq!(expired.value(), "");
}
