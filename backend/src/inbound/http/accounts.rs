//! Account API handlers.
//!
//! ```text
//! POST /webapi/accounts {"instructorName":"...","instructorEmail":"...","institute":"..."}
//! DELETE /webapi/account?googleid=...
//! ```

use actix_web::{delete, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::ports::NewAccountRequest;
use crate::domain::{Error, GoogleId};
use crate::inbound::http::error::MessageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body for `POST /webapi/accounts`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Full name of the instructor.
    pub instructor_name: String,
    /// Contact email of the instructor.
    pub instructor_email: String,
    /// Institute the instructor belongs to.
    pub institute: String,
}

/// Response body for `POST /webapi/accounts`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    /// Join link to hand to the new instructor.
    pub join_link: String,
}

/// Query parameters identifying an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountQuery {
    /// Identifier of the account to operate on.
    pub googleid: String,
}

/// Create an instructor account.
///
/// Only admins may create accounts; the welcome email is delivered by an
/// external collaborator and not sent from here.
#[utoipa::path(
    post,
    path = "/webapi/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = CreateAccountResponse),
        (status = 400, description = "Invalid request", body = MessageResponse),
        (status = 403, description = "Admin privilege required", body = MessageResponse),
        (status = 504, description = "Unclassified failure", body = MessageResponse)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/accounts")]
pub async fn create_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAccountRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let payload = payload.into_inner();
    let created = state
        .accounts()
        .create_account(NewAccountRequest {
            instructor_name: payload.instructor_name,
            instructor_email: payload.instructor_email,
            institute: payload.institute,
        })
        .await?;
    Ok(HttpResponse::Created().json(CreateAccountResponse {
        join_link: created.join_link,
    }))
}

/// Delete an account and cascade to its profile.
#[utoipa::path(
    delete,
    path = "/webapi/account",
    params(("googleid" = String, Query, description = "Identifier of the account to delete")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 400, description = "Invalid identifier", body = MessageResponse),
        (status = 403, description = "Admin privilege required", body = MessageResponse),
        (status = 504, description = "Unclassified failure", body = MessageResponse)
    ),
    tags = ["accounts"],
    operation_id = "deleteAccount"
)]
#[delete("/account")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AccountQuery>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let google_id =
        GoogleId::new(&query.googleid).map_err(|err| Error::invalid_parameter(err.to_string()))?;
    state.accounts().delete_account(&google_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Account is successfully deleted.")))
}
