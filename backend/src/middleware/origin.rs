//! Cross-origin request filtering.
//!
//! State-changing requests to the `/webapi` scope must carry an `Origin`
//! header (or, failing that, a `Referer`) matching either the configured
//! front-end origins or the serving origin itself. Requests that fail the
//! check are rejected with an unauthorized-access error; safe methods pass
//! through untouched.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::http::Method;
use actix_web::Error;
use actix_web::ResponseError;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use url::Url;

use crate::domain::Error as DomainError;

/// Reduce an origin or referrer value to its `scheme://host[:port]` form.
///
/// Returns `None` for opaque origins (`null`, `data:` URLs, and similar).
fn normalise_origin(value: &str) -> Option<String> {
    let url = Url::parse(value).ok()?;
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

fn is_state_changing(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD && *method != Method::OPTIONS
}

fn request_origin(req: &ServiceRequest) -> Option<String> {
    let declared = req
        .headers()
        .get(header::ORIGIN)
        .or_else(|| req.headers().get(header::REFERER))?;
    normalise_origin(declared.to_str().ok()?)
}

fn serving_origin(req: &ServiceRequest) -> Option<String> {
    let own = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };
    normalise_origin(&own)
}

/// Origin-check middleware for the API scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::OriginCheck;
///
/// let app = App::new().wrap(OriginCheck::new(&["https://app.example.org".to_owned()]));
/// ```
#[derive(Clone)]
pub struct OriginCheck {
    allowed: Arc<Vec<String>>,
}

impl OriginCheck {
    /// Build the middleware from the configured front-end origins.
    ///
    /// Values that do not parse as origins are dropped; the serving origin
    /// is always accepted.
    #[must_use]
    pub fn new(allowed_origins: &[String]) -> Self {
        let allowed = allowed_origins
            .iter()
            .filter_map(|value| normalise_origin(value))
            .collect();
        Self {
            allowed: Arc::new(allowed),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OriginCheck
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = OriginCheckMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OriginCheckMiddleware {
            service,
            allowed: Arc::clone(&self.allowed),
        }))
    }
}

/// Service wrapper produced by [`OriginCheck`].
///
/// Applications should not use this type directly.
pub struct OriginCheckMiddleware<S> {
    service: S,
    allowed: Arc<Vec<String>>,
}

fn check(allowed: &[String], req: &ServiceRequest) -> Result<(), DomainError> {
    if !is_state_changing(req.method()) {
        return Ok(());
    }

    let Some(origin) = request_origin(req) else {
        return Err(DomainError::unauthorized_access(
            "Missing origin; this request is not allowed to access this resource",
        ));
    };

    if allowed.contains(&origin) || serving_origin(req) == Some(origin.clone()) {
        return Ok(());
    }

    Err(DomainError::unauthorized_access(format!(
        "Origin '{origin}' is not allowed to access this resource"
    )))
}

impl<S, B> Service<ServiceRequest> for OriginCheckMiddleware<S>
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
        match check(&self.allowed, &req) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
            }
            Err(rejection) => {
                let response = rejection.error_response().map_into_right_body();
                let (http_req, _payload) = req.into_parts();
                Box::pin(ready(Ok(ServiceResponse::new(http_req, response))))
            }
        }
    }
}
