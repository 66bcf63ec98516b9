//! Student profile API handlers.
//!
//! ```text
//! GET /webapi/profile[?googleid=...]
//! PUT /webapi/profile[?googleid=...] {"shortName":"...","gender":"female",...}
//! DELETE /webapi/profile[?googleid=...]
//! ```
//!
//! Without a `googleid` parameter the handlers operate on the session
//! user's own profile; naming someone else requires the admin role.

use actix_web::{delete, get, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Gender, GoogleId, Profile, ProfileUpdate};
use crate::inbound::http::error::MessageResponse;
use crate::inbound::http::session::{SessionContext, SessionUser};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Query parameters selecting the profile to operate on.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileQuery {
    /// Identifier of the profile; defaults to the session user.
    pub googleid: Option<String>,
}

/// Profile representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileData {
    /// Identifier shared with the owning account.
    pub google_id: String,
    /// Shortened name shown alongside feedback.
    pub short_name: String,
    /// Long-term personal email.
    pub email: String,
    /// University, school, or institute.
    pub institute: String,
    /// Nationality.
    pub nationality: String,
    /// Gender: `male`, `female`, or `other`.
    pub gender: String,
    /// Free-text bio.
    pub more_info: String,
    /// Reference key of the profile picture; empty when none uploaded.
    pub picture_key: String,
    /// Timestamp of the last persisted mutation.
    pub modified_at: DateTime<Utc>,
}

impl From<Profile> for StudentProfileData {
    fn from(profile: Profile) -> Self {
        Self {
            google_id: profile.google_id.to_string(),
            short_name: profile.short_name,
            email: profile.email,
            institute: profile.institute,
            nationality: profile.nationality,
            gender: profile.gender.to_string(),
            more_info: profile.more_info,
            picture_key: profile.picture_key,
            modified_at: profile.modified_at,
        }
    }
}

/// Request body for `PUT /webapi/profile`; absent fields keep their stored
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Replacement short name.
    pub short_name: Option<String>,
    /// Replacement email.
    pub email: Option<String>,
    /// Replacement institute.
    pub institute: Option<String>,
    /// Replacement nationality.
    pub nationality: Option<String>,
    /// Replacement gender: `male`, `female`, or `other`.
    pub gender: Option<String>,
    /// Replacement bio.
    pub more_info: Option<String>,
    /// Replacement picture reference key.
    pub picture_key: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let gender = value
            .gender
            .map(|raw| {
                raw.parse::<Gender>()
                    .map_err(|err| Error::invalid_parameter(err.to_string()))
            })
            .transpose()?;
        Ok(Self {
            short_name: value.short_name,
            email: value.email,
            institute: value.institute,
            nationality: value.nationality,
            gender,
            more_info: value.more_info,
            picture_key: value.picture_key,
        })
    }
}

// Everyone may touch their own profile; touching another requires admin.
fn resolve_target(user: &SessionUser, query: &ProfileQuery) -> Result<GoogleId, Error> {
    let Some(raw) = &query.googleid else {
        return Ok(user.google_id.clone());
    };
    let target = GoogleId::new(raw).map_err(|err| Error::invalid_parameter(err.to_string()))?;
    if target != user.google_id && !user.is_admin {
        return Err(Error::unauthorized_access(
            "You are not authorized to access this resource",
        ));
    }
    Ok(target)
}

/// Fetch a student profile.
///
/// A profile that was never written comes back with the default field
/// values rather than an error.
#[utoipa::path(
    get,
    path = "/webapi/profile",
    params(("googleid" = Option<String>, Query, description = "Profile identifier; defaults to the session user")),
    responses(
        (status = 200, description = "Profile", body = StudentProfileData),
        (status = 400, description = "Invalid identifier", body = MessageResponse),
        (status = 403, description = "Not authorized", body = MessageResponse),
        (status = 504, description = "Unclassified failure", body = MessageResponse)
    ),
    tags = ["profiles"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ProfileQuery>,
) -> ApiResult<web::Json<StudentProfileData>> {
    let user = session.require_user()?;
    let target = resolve_target(&user, &query)?;
    let profile = state.profiles_query().fetch_profile(&target).await?;
    Ok(web::Json(profile.into()))
}

/// Update a student profile, creating it with defaults when missing.
#[utoipa::path(
    put,
    path = "/webapi/profile",
    request_body = UpdateProfileRequest,
    params(("googleid" = Option<String>, Query, description = "Profile identifier; defaults to the session user")),
    responses(
        (status = 200, description = "Profile as persisted", body = StudentProfileData),
        (status = 400, description = "Invalid field value", body = MessageResponse),
        (status = 403, description = "Not authorized", body = MessageResponse),
        (status = 504, description = "Unclassified failure", body = MessageResponse)
    ),
    tags = ["profiles"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ProfileQuery>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<StudentProfileData>> {
    let user = session.require_user()?;
    let target = resolve_target(&user, &query)?;
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let profile = state
        .profiles_command()
        .update_profile(&target, update)
        .await?;
    Ok(web::Json(profile.into()))
}

/// Delete a student profile.
///
/// Fails silently when no profile exists.
#[utoipa::path(
    delete,
    path = "/webapi/profile",
    params(("googleid" = Option<String>, Query, description = "Profile identifier; defaults to the session user")),
    responses(
        (status = 200, description = "Profile deleted", body = MessageResponse),
        (status = 400, description = "Invalid identifier", body = MessageResponse),
        (status = 403, description = "Not authorized", body = MessageResponse),
        (status = 504, description = "Unclassified failure", body = MessageResponse)
    ),
    tags = ["profiles"],
    operation_id = "deleteProfile"
)]
#[delete("/profile")]
pub async fn delete_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ProfileQuery>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;
    let target = resolve_target(&user, &query)?;
    state.profiles_command().delete_profile(&target).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Student profile is successfully deleted.",
    )))
}
