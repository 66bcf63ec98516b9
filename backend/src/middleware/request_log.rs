//! Request logging middleware.
//!
//! Every request through the `/webapi` scope is assigned a UUID request
//! identifier held in task-local storage, logged with its method, URL,
//! query parameters, and headers, and answered with a
//! `Strict-Transport-Security` header. The middleware always forwards to the
//! inner service; logging never short-circuits a request, and the response
//! headers are applied to error responses as well as successful ones.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`RequestId::scope`] when spawning new tasks to ensure the active request
//! identifier propagates correctly.

use std::future::Future;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tokio::task_local;
use tracing::{error, info};
use uuid::Uuid;

task_local! {
    static REQUEST_ID: RequestId;
}

/// Value of the strict-transport-security header set on every response.
pub const STRICT_TRANSPORT_SECURITY: &str = "max-age=31536000";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use backend::middleware::request_log::RequestId;
///
/// async fn handler() {
///     if let Some(id) = RequestId::current() {
///         tracing::info!(request_id = %id, "handling");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the current request identifier if one is in scope.
    #[must_use]
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(|id| *id).ok()
    }

    /// Execute the provided future with the supplied identifier in scope.
    pub async fn scope<Fut>(request_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(request_id, fut).await
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn format_headers(req: &ServiceRequest) -> String {
    let mut pairs: Vec<String> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            format!("{name}: {}", value.to_str().unwrap_or("<non-ascii>"))
        })
        .collect();
    pairs.sort();
    pairs.join(", ")
}

fn apply_response_headers<B>(res: &mut ServiceResponse<B>, request_id: RequestId) {
    let headers = res.response_mut().headers_mut();
    headers.insert(
        HeaderName::from_static("strict-transport-security"),
        HeaderValue::from_static(STRICT_TRANSPORT_SECURITY),
    );
    match HeaderValue::from_str(&request_id.to_string()) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        Err(encode_error) => {
            error!(
                error = %encode_error,
                request_id = %request_id,
                "failed to encode request identifier header"
            );
        }
    }
}

/// Logging middleware for the API scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::RequestLog;
///
/// let app = App::new().wrap(RequestLog);
/// ```
#[derive(Clone)]
pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestLog`].
///
/// Applications should not use this type directly.
pub struct RequestLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::generate();
        info!(
            request_id = %request_id,
            method = %req.method(),
            url = %req.uri(),
            params = %req.query_string(),
            headers = %format_headers(&req),
            "request received"
        );

        // Needed to materialise a response when the inner service errors.
        let http_req = req.request().clone();
        let fut = self.service.call(req);
        Box::pin(RequestId::scope(request_id, async move {
            let mut res = match fut.await {
                Ok(res) => res.map_into_left_body(),
                Err(err) => {
                    let response = err.error_response().map_into_right_body();
                    ServiceResponse::new(http_req, response)
                }
            };
            apply_response_headers(&mut res, request_id);
            Ok(res)
        }))
    }
}
