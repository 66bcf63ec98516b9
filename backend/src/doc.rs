//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the account, profile, diagnostics, and health endpoints;
//! - **Schemas**: the request/response DTOs, including the single-field
//!   message envelope every error response uses;
//! - **Security**: the session cookie established by the upstream
//!   authentication layer.
//!
//! The generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::accounts::{CreateAccountRequest, CreateAccountResponse};
use crate::inbound::http::error::MessageResponse;
use crate::inbound::http::profiles::{StudentProfileData, UpdateProfileRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie established by the upstream authentication layer.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Peer feedback backend API",
        description = "HTTP interface for account and student profile management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::delete_account,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::update_profile,
        crate::inbound::http::profiles::delete_profile,
        crate::inbound::http::exceptions::raise_exception,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        MessageResponse,
        CreateAccountRequest,
        CreateAccountResponse,
        StudentProfileData,
        UpdateProfileRequest
    )),
    tags(
        (name = "accounts", description = "Account lifecycle operations"),
        (name = "profiles", description = "Student profile operations"),
        (name = "diagnostics", description = "Dev-mode diagnostics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::openapi::schema::Schema;
    use utoipa::openapi::RefOr;
    use utoipa::OpenApi;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn the_message_envelope_schema_has_its_single_field() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get("MessageResponse").expect("envelope schema");
        assert_object_schema_has_field(envelope, "message");
    }

    #[test]
    fn the_profile_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let profile = schemas.get("StudentProfileData").expect("profile schema");
        for field in [
            "googleId",
            "shortName",
            "email",
            "institute",
            "nationality",
            "gender",
            "moreInfo",
            "pictureKey",
            "modifiedAt",
        ] {
            assert_object_schema_has_field(profile, field);
        }
    }

    #[test]
    fn every_api_path_is_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/webapi/accounts",
            "/webapi/account",
            "/webapi/profile",
            "/webapi/exception/{kind}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "path {path} should be registered"
            );
        }
    }
}
