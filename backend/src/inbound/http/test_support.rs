//! Shared fixtures for handler tests.
//!
//! Builds an application wired like production (state, session middleware,
//! the `/webapi` scope) but backed by mock driving ports, plus a seeding
//! route so tests can establish sessions without an authentication layer.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{MockAccountsCommand, MockProfilesCommand, MockProfilesQuery};
use crate::domain::{Error, GoogleId};
use crate::inbound::http::session::{SessionContext, SessionUser};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{accounts, exceptions, profiles, test_utils};

/// Mock driving ports handed to [`seeded_app`].
#[derive(Default)]
pub struct TestPorts {
    /// Account lifecycle mock.
    pub accounts: MockAccountsCommand,
    /// Profile read mock.
    pub profiles_query: MockProfilesQuery,
    /// Profile write mock.
    pub profiles_command: MockProfilesCommand,
    /// Dev-mode flag for the diagnostics endpoint.
    pub dev_mode: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SeedUser {
    google_id: String,
    is_admin: bool,
}

async fn seed_session(
    session: SessionContext,
    payload: web::Json<SeedUser>,
) -> Result<HttpResponse, Error> {
    let user = SessionUser {
        google_id: GoogleId::new(&payload.google_id)
            .map_err(|err| Error::invalid_parameter(err.to_string()))?,
        is_admin: payload.is_admin,
    };
    session.persist_user(&user)?;
    Ok(HttpResponse::Ok().finish())
}

/// Build an app with the production routing wired to the given mocks.
pub fn seeded_app(
    ports: TestPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        Arc::new(ports.accounts),
        Arc::new(ports.profiles_query),
        Arc::new(ports.profiles_command),
        ports.dev_mode,
    );
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_utils::test_session_middleware())
        .service(
            web::scope("/webapi")
                .service(accounts::create_account)
                .service(accounts::delete_account)
                .service(profiles::get_profile)
                .service(profiles::update_profile)
                .service(profiles::delete_profile)
                .service(exceptions::raise_exception),
        )
        .route("/test-login", web::post().to(seed_session))
}

/// Log the given user in and return the session cookie.
///
/// # Panics
/// Panics when the seeding round trip fails; tests cannot proceed without a
/// session.
pub async fn session_cookie<S, B>(app: &S, user: &SessionUser) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/test-login")
        .set_json(SeedUser {
            google_id: user.google_id.to_string(),
            is_admin: user.is_admin,
        })
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "session seeding failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
