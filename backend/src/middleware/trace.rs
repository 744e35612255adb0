//! Request correlation for the timer API.
//!
//! [`Trace`] gives every request a [`TraceId`] for the lifetime of its
//! handler. Clients that already tag their calls (the same way WebSocket
//! messages carry `traceId`) may send a `trace-id` header holding a UUID; it
//! is adopted as is. Otherwise a fresh id is generated. The id is echoed in
//! the `trace-id` response header and stamped on error payloads.
//!
//! The id lives in task-local storage and is not inherited by spawned tasks;
//! wrap such work in [`TraceId::scope`].

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware scoping each request to a [`TraceId`].
///
/// Handlers read the id with [`TraceId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use timers_backend::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = client_trace_id(&req).unwrap_or_else(TraceId::generate);
        let header_value = trace_id.to_string();
        let method = req.method().clone();
        let path = req.path().to_owned();
        // Handler futures are lazy, so extractors and the handler body both run
        // inside the scope below.
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&header_value) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(
                        %error,
                        trace_id = %trace_id,
                        "failed to encode trace identifier header"
                    );
                }
            }
            debug!(
                trace_id = %trace_id,
                method = %method,
                path = %path,
                status = res.status().as_u16(),
                "request completed"
            );
            Ok(res)
        }))
    }
}

/// Trace id supplied by the client, if it sent a well-formed one.
fn client_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error as ApiError, TimerError, TimerId};
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    const CLIENT_ID: &str = "7b1c9a52-3e0f-4d6b-9a51-2f4c8e6d1a90";

    async fn echo_current() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn missing_timer() -> Result<HttpResponse, ApiError> {
        Err(TimerError::TimerNotFound {
            id: TimerId::random(),
        }
        .into())
    }

    fn header_of(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned()
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(CLIENT_ID), true)]
    #[case(Some("  7b1c9a52-3e0f-4d6b-9a51-2f4c8e6d1a90 "), true)]
    #[case(Some("timer-42"), false)]
    #[case(Some(""), false)]
    #[actix_web::test]
    async fn handler_sees_the_echoed_trace_id(
        #[case] incoming: Option<&str>,
        #[case] adopted: bool,
    ) {
        let app = test::init_service(App::new().wrap(Trace).route("/", web::get().to(echo_current)))
            .await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(value) = incoming {
            req = req.insert_header((TRACE_ID_HEADER, value));
        }
        let res = test::call_service(&app, req.to_request()).await;

        let header = header_of(&res);
        assert!(header.parse::<TraceId>().is_ok(), "{header} is a UUID");
        assert_eq!(header == CLIENT_ID, adopted, "{incoming:?}");
        let body = test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), header);
    }

    #[actix_web::test]
    async fn untagged_requests_get_distinct_ids() {
        let app = test::init_service(App::new().wrap(Trace).route("/", web::get().to(echo_current)))
            .await;
        let first = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let second = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_ne!(header_of(&first), header_of(&second));
    }

    #[actix_web::test]
    async fn timer_errors_carry_the_client_trace_id() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/timers/stop", web::post().to(missing_timer)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/timers/stop")
            .insert_header((TRACE_ID_HEADER, CLIENT_ID))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
        assert_eq!(header_of(&res), CLIENT_ID);
        let body: ApiError = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(CLIENT_ID));
        assert_eq!(
            body.details().and_then(|details| details.get("code")),
            Some(&serde_json::json!("timer_not_found"))
        );
    }
}
