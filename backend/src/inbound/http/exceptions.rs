//! Diagnostic endpoint raising each error category on demand.
//!
//! Lets operators exercise the error translation end to end. Available only
//! when the server runs in dev mode.

use actix_web::{get, web, HttpResponse};

use crate::domain::Error;
use crate::inbound::http::error::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Raise the error category named in the path.
///
/// Unknown names fall through to a plain success message.
#[utoipa::path(
    get,
    path = "/webapi/exception/{kind}",
    params(("kind" = String, Path, description = "Error category to raise")),
    responses(
        (status = 200, description = "Unknown category; nothing raised", body = MessageResponse),
        (status = 400, description = "Raised invalid-parameter", body = MessageResponse),
        (status = 403, description = "Raised unauthorized-access, or dev mode is off", body = MessageResponse),
        (status = 504, description = "Raised deadline-exceeded or internal", body = MessageResponse)
    ),
    tags = ["diagnostics"],
    operation_id = "raiseException"
)]
#[get("/exception/{kind}")]
pub async fn raise_exception(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if !state.dev_mode() {
        return Err(Error::unauthorized_access(
            "Admin privilege is required to access this resource",
        ));
    }

    match path.into_inner().as_str() {
        "invalid-parameter" => Err(Error::invalid_parameter("invalid parameter testing")),
        "unauthorized-access" => Err(Error::unauthorized_access("unauthorized access testing")),
        "deadline-exceeded" => Err(Error::deadline_exceeded("deadline exceeded testing")),
        "internal" => Err(Error::internal("internal error testing")),
        _ => Ok(HttpResponse::Ok().json(MessageResponse::new("Test output"))),
    }
}
