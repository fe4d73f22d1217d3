//! Per-request panic boundary.
//!
//! A panic raised while building or polling the inner service future is
//! caught here, logged with a backtrace, and answered with a 500 carrying an
//! [`InternalErrorBody`]. The worker keeps serving other requests.
//!
//! The request is consumed by the panicking service, so the 500 travels as an
//! [`actix_web::Error`] whose response is already rendered. Outer middleware
//! sees it on the `Err` path and the server writes it unchanged.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::inbound::http::error::{InternalErrorBody, json_response};

/// Middleware converting handler panics into 500 responses.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gateway::middleware::Recover;
///
/// let app = App::new().wrap(Recover);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Recover;

impl<S, B> Transform<S, ServiceRequest> for Recover
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RecoverMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoverMiddleware { service }))
    }
}

/// Service wrapper produced by [`Recover`].
///
/// Applications should not use this type directly.
pub struct RecoverMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RecoverMiddleware<S>
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
        // Routing needs sole ownership of the request, so only the URL is kept.
        let url = req.uri().to_string();
        let fut = match catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(panic) => return Box::pin(ready(Err(panic_error(url, panic.as_ref())))),
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(panic_error(url, panic.as_ref())),
            }
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

fn panic_error(url: String, panic: &(dyn Any + Send)) -> Error {
    let message = panic_message(panic);
    let backtrace = Backtrace::force_capture();
    error!(
        panic = %message,
        %url,
        backtrace = %backtrace,
        "request handler panicked"
    );
    let body = InternalErrorBody::new(url, format!("internal server error: {message}"));
    let response = json_response(StatusCode::INTERNAL_SERVER_ERROR, &body);
    InternalError::from_response(message, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn boom() -> HttpResponse {
        panic!("kaboom");
    }

    async fn rendered(error: &Error) -> (StatusCode, Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body())
            .await
            .unwrap_or_else(|_| panic!("error body readable"));
        let body = serde_json::from_slice(&bytes).expect("error body is JSON");
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn panicking_handler_yields_internal_error_body() {
        let app = actix_test::init_service(
            App::new().wrap(Recover).route("/boom", web::get().to(boom)),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/boom?x=1").to_request();
        let error = actix_test::try_call_service(&app, req)
            .await
            .err()
            .expect("panic surfaces as an error");

        let (status, body) = rendered(&error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "statusCode": 500,
                "requestUrl": "/boom?x=1",
                "msg": "internal server error: kaboom"
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn routed_requests_pass_through_untouched() {
        let app = actix_test::init_service(
            App::new()
                .wrap(Recover)
                .route("/items/{id}", web::get().to(|path: web::Path<String>| async move {
                    HttpResponse::Ok().body(path.into_inner())
                })),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/items/42").to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            actix_test::read_body(res).await,
            web::Bytes::from_static(b"42")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn service_keeps_serving_after_a_panic() {
        let app = actix_test::init_service(
            App::new()
                .wrap(Recover)
                .route("/boom", web::get().to(boom))
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") })),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/boom").to_request();
        let error = actix_test::try_call_service(&app, req)
            .await
            .err()
            .expect("panic surfaces as an error");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let req = actix_test::TestRequest::get().uri("/ok").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            actix_test::read_body(res).await,
            web::Bytes::from_static(b"fine")
        );
    }

    #[rstest]
    #[case(Box::new("static"), "static")]
    #[case(Box::new(String::from("owned")), "owned")]
    #[case(Box::new(7_u8), "unknown panic payload")]
    fn panic_message_reads_common_payloads(
        #[case] payload: Box<dyn Any + Send>,
        #[case] expected: &str,
    ) {
        assert_eq!(panic_message(payload.as_ref()), expected);
    }
}
