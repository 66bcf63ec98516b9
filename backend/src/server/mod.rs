//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpRequest, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::ports::ProfilesCommand;
use crate::domain::{AccountsService, Error, ProfilesService};
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{accounts, exceptions, pages, profiles};
use crate::middleware::{OriginCheck, RequestLog};
use crate::outbound::persistence::{
    MemoryAccountRepository, MemoryPictureStore, MemoryProfileRepository,
};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    allowed_origins: Arc<Vec<String>>,
}

fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let profiles_service = Arc::new(ProfilesService::new(
        Arc::new(MemoryProfileRepository::new()),
        Arc::new(MemoryPictureStore::new()),
    ));
    let profiles_command: Arc<dyn ProfilesCommand> = profiles_service.clone();
    let accounts_service = Arc::new(AccountsService::new(
        Arc::new(MemoryAccountRepository::new()),
        profiles_command.clone(),
        config.front_end_base.clone(),
    ));
    web::Data::new(HttpState::new(
        accounts_service,
        profiles_service,
        profiles_command,
        config.dev_mode,
    ))
}

// Funnel framework extractor failures through the standard envelope so body
// and parameter errors read the same as handler-raised ones.
fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    Error::invalid_parameter(err.to_string()).into()
}

fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    Error::invalid_parameter(err.to_string()).into()
}

fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    Error::invalid_parameter(err.to_string()).into()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        allowed_origins,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    // Wrapping is last-in, first-run: origin check, then logging, then the
    // session layer around the handlers.
    let api = web::scope("/webapi")
        .wrap(session)
        .wrap(RequestLog)
        .wrap(OriginCheck::new(&allowed_origins))
        .service(accounts::create_account)
        .service(accounts::delete_account)
        .service(profiles::get_profile)
        .service(profiles::update_profile)
        .service(profiles::delete_profile)
        .service(exceptions::raise_exception);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(api)
        .service(pages::web_page)
        .service(pages::legacy_page)
        .service(pages::home)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build and start the HTTP server.
///
/// The returned [`Server`] must be awaited; readiness is signalled through
/// `health_state` by the caller once the bind succeeds.
///
/// # Errors
/// Returns [`std::io::Error`] when binding the listen address fails.
pub fn run(config: &ServerConfig, health_state: web::Data<HealthState>) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state,
        http_state: build_http_state(config),
        key: config.key.clone(),
        cookie_secure: config.cookie_secure,
        allowed_origins: Arc::new(config.allowed_origins.clone()),
    };
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    fn test_deps(allowed_origins: Vec<String>) -> AppDependencies {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            "127.0.0.1:0".parse().expect("valid address"),
        )
        .with_allowed_origins(allowed_origins)
        .with_dev_mode(true);
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config),
            key: config.key.clone(),
            cookie_secure: false,
            allowed_origins: Arc::new(config.allowed_origins.clone()),
        }
    }

    #[actix_web::test]
    async fn the_api_scope_is_wrapped_by_the_filter_chain() {
        let app = test::init_service(build_app(test_deps(Vec::new()))).await;

        // Safe request passes the origin check and gains the logging
        // filter's headers.
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/webapi/exception/no-such-category")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("strict-transport-security"));
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[actix_web::test]
    async fn cross_origin_writes_are_rejected_at_the_scope_boundary() {
        let app = test::init_service(build_app(test_deps(Vec::new()))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/webapi/accounts")
                .insert_header(("Origin", "https://evil.example.org"))
                .set_json(serde_json::json!({
                    "instructorName": "Ada",
                    "instructorEmail": "ada@lovelace.org",
                    "institute": "AEI"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn malformed_json_bodies_use_the_envelope() {
        let app = test::init_service(build_app(test_deps(Vec::new()))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/webapi/accounts")
                .insert_header(("Origin", "http://localhost:8080"))
                .insert_header(("Content-Type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert!(body.get("message").and_then(Value::as_str).is_some());
    }

    #[actix_web::test]
    async fn the_error_translation_runs_end_to_end() {
        let app = test::init_service(build_app(test_deps(Vec::new()))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/webapi/exception/deadline-exceeded")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(res.headers().contains_key("strict-transport-security"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("deadline exceeded testing")
        );
    }

    #[actix_web::test]
    async fn pages_and_redirects_are_mounted() {
        let app = test::init_service(build_app(test_deps(Vec::new()))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/page/instructorCourseJoin?key=reg-1")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/web/front/home").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
