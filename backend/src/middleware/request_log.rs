//! Completion logging middleware.
//!
//! Every request receives a UUID request id, echoed in the `x-request-id`
//! response header and attached to a tracing span around the inner service.
//! Once the response is ready one `request completed` record is emitted with
//! the URL, method, a best-effort copy of the body, and the status. Responses
//! with a 5xx status are logged at error level, everything else at info.
//!
//! Body capture never fails the request. Only bodies that declare a
//! `Content-Length` no larger than [`MAX_LOGGED_BODY_BYTES`] are read, and the
//! read gives up after the configured timeout. Whatever was read is replayed
//! ahead of the unread remainder, so handlers still see the full payload, or
//! the read error when the client broke off.

use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use actix_http::BoxedPayloadStream;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::{InternalError, PayloadError};
use actix_web::http::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use futures_util::{StreamExt, stream};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Largest request body copied into the completion record.
pub const MAX_LOGGED_BODY_BYTES: usize = 64 * 1024;

/// How long the body copy may wait on a slow client.
pub const DEFAULT_BODY_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Middleware logging one record per completed request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gateway::middleware::RequestLog;
///
/// let app = App::new().wrap(RequestLog::default());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RequestLog {
    body_read_timeout: Duration,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self {
            body_read_timeout: DEFAULT_BODY_READ_TIMEOUT,
        }
    }
}

impl RequestLog {
    /// Bound the body copy by `timeout` instead of the default.
    #[must_use]
    pub fn with_body_read_timeout(timeout: Duration) -> Self {
        Self {
            body_read_timeout: timeout,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware {
            service: Rc::new(service),
            body_read_timeout: self.body_read_timeout,
        }))
    }
}

/// Service wrapper produced by [`RequestLog`].
///
/// Applications should not use this type directly.
pub struct RequestLogMiddleware<S> {
    service: Rc<S>,
    body_read_timeout: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
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

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let body_read_timeout = self.body_read_timeout;
        let request_id = Uuid::new_v4();
        let span = info_span!("request", %request_id);
        Box::pin(
            async move {
                let url = req.uri().to_string();
                let method = req.method().to_string();
                let body = capture_body(&mut req, body_read_timeout).await;

                let completed = |status: StatusCode| {
                    let code = status.as_u16();
                    if status.is_server_error() {
                        error!(%request_id, %url, %method, %body, status = code, "request completed");
                    } else {
                        info!(%request_id, %url, %method, %body, status = code, "request completed");
                    }
                };

                match service.call(req).await {
                    Ok(mut res) => {
                        insert_request_id(res.response_mut().headers_mut(), request_id);
                        completed(res.status());
                        Ok(res)
                    }
                    Err(err) => {
                        let mut response = err.error_response();
                        insert_request_id(response.headers_mut(), request_id);
                        completed(response.status());
                        Err(InternalError::from_response(err.to_string(), response).into())
                    }
                }
            }
            .instrument(span),
        )
    }
}

fn insert_request_id(headers: &mut HeaderMap, request_id: Uuid) {
    match HeaderValue::from_str(&request_id.to_string()) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        Err(error) => {
            error!(%error, "failed to encode request id header");
        }
    }
}

fn declared_length(req: &ServiceRequest) -> Option<usize> {
    req.headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Copy a small request body for logging and put it back in front of the
/// unread part of the payload.
///
/// Returns an empty string when the body was not read in full.
async fn capture_body(req: &mut ServiceRequest, read_timeout: Duration) -> String {
    let Some(length) = declared_length(req) else {
        return String::new();
    };
    if length == 0 || length > MAX_LOGGED_BODY_BYTES {
        return String::new();
    }

    let mut payload = req.take_payload();
    let mut buffer = BytesMut::with_capacity(length);
    let mut failure: Option<PayloadError> = None;
    let read = tokio::time::timeout(read_timeout, async {
        while let Some(chunk) = payload.next().await {
            match chunk {
                Ok(bytes) => buffer.extend_from_slice(&bytes),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }
    })
    .await;

    let logged = match (&read, &failure) {
        (Err(_), _) => {
            warn!(timeout = ?read_timeout, "request body read timed out, not logging it");
            String::new()
        }
        (Ok(()), Some(error)) => {
            warn!(%error, "failed to read request body for logging");
            String::new()
        }
        (Ok(()), None) => String::from_utf8_lossy(&buffer).into_owned(),
    };

    req.set_payload(replay(buffer.freeze(), failure, payload));
    logged
}

/// Yield `read` first, then the read error if there was one, then the rest.
fn replay(read: Bytes, failure: Option<PayloadError>, rest: Payload) -> Payload {
    let mut head = Vec::with_capacity(2);
    if !read.is_empty() {
        head.push(Ok(read));
    }
    if let Some(error) = failure {
        head.push(Err(error));
    }
    let stream: BoxedPayloadStream = Box::pin(stream::iter(head).chain(rest));
    Payload::from(stream)
}
