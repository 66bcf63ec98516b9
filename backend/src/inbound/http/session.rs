//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The upstream authentication layer establishes the session; this module
//! only reads it back. Handlers deal with a [`SessionUser`] rather than raw
//! cookie values.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, GoogleId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const IS_ADMIN_KEY: &str = "is_admin";

/// Identity carried by an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Identifier of the logged-in user.
    pub google_id: GoogleId,
    /// Whether the user holds the admin role.
    pub is_admin: bool,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user in the session cookie.
    ///
    /// Called by the authentication layer; exposed here so tests can seed
    /// sessions the same way.
    pub fn persist_user(&self, user: &SessionUser) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.google_id.as_ref())
            .and_then(|()| self.0.insert(IS_ADMIN_KEY, user.is_admin))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user from the session, if present.
    pub fn user(&self) -> Result<Option<SessionUser>, Error> {
        let raw_id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw_id) = raw_id else {
            return Ok(None);
        };
        let google_id = match GoogleId::new(&raw_id) {
            Ok(id) => id,
            Err(parse_error) => {
                tracing::warn!("invalid user id in session cookie: {parse_error}");
                return Ok(None);
            }
        };
        let is_admin = self
            .0
            .get::<bool>(IS_ADMIN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
            .unwrap_or(false);
        Ok(Some(SessionUser {
            google_id,
            is_admin,
        }))
    }

    /// Require an authenticated user or fail with unauthorized access.
    pub fn require_user(&self) -> Result<SessionUser, Error> {
        self.user()?.ok_or_else(|| {
            Error::unauthorized_access("Login is required to access this resource")
        })
    }

    /// Require an authenticated admin or fail with unauthorized access.
    pub fn require_admin(&self) -> Result<SessionUser, Error> {
        let user = self.require_user()?;
        if !user.is_admin {
            return Err(Error::unauthorized_access(
                "Admin privilege is required to access this resource",
            ));
        }
        Ok(user)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    fn fixture_user(is_admin: bool) -> SessionUser {
        SessionUser {
            google_id: GoogleId::new("ada.lovelace").expect("fixture id"),
            is_admin,
        }
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    #[actix_web::test]
    async fn round_trips_the_session_user() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/seed",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&fixture_user(true))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let user = session.require_admin()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(user.google_id.to_string()))
                    }),
                ),
        )
        .await;

        let seed_res =
            test::call_service(&app, test::TestRequest::get().uri("/seed").to_request()).await;
        assert_eq!(seed_res.status(), StatusCode::OK);
        let cookie = seed_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let whoami_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(whoami_res.status(), StatusCode::OK);
        let body = test::read_body(whoami_res).await;
        assert_eq!(body, "ada.lovelace");
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorized() {
        let app = test::init_service(session_test_app().route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_user()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn non_admins_cannot_pass_the_admin_gate() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/seed",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&fixture_user(false))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/admin",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_admin()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let seed_res =
            test::call_service(&app, test::TestRequest::get().uri("/seed").to_request()).await;
        let cookie = seed_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
