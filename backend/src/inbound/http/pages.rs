//! Page handlers: the single-page app shell, the landing redirect, and the
//! legacy URL redirector.

use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::domain::app_url::{AppUrl, EntityType, HOME_PAGE, JOIN_PAGE};
use crate::middleware::request_log::STRICT_TRANSPORT_SECURITY;

/// Content security policy applied to page responses.
pub const CSP_POLICY: &str = "default-src 'none'; \
    script-src 'self'; \
    style-src 'self' 'unsafe-inline'; \
    frame-src 'self' docs.google.com; \
    img-src 'self' data:; \
    connect-src 'self'; \
    form-action 'none'; \
    frame-ancestors 'self'; \
    base-uri 'self'";

// Served in place of the built front-end bundle; deployments overlay the
// real assets under /dist.
const APP_SHELL: &str = "<!DOCTYPE html>\n\
    <html lang=\"en\">\n\
    <head>\n\
    <meta charset=\"utf-8\">\n\
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
    <title>Peer Feedback</title>\n\
    <link rel=\"stylesheet\" href=\"/dist/styles.css\">\n\
    </head>\n\
    <body>\n\
    <app-root></app-root>\n\
    <script src=\"/dist/main.js\"></script>\n\
    </body>\n\
    </html>\n";

/// Legacy paths for joining a course as an instructor.
const LEGACY_INSTRUCTOR_COURSE_JOIN: &str = "/page/instructorCourseJoin";
/// Legacy paths for joining a course as a student.
const LEGACY_STUDENT_COURSE_JOIN: &str = "/page/studentCourseJoinAuthenticated";
const LEGACY_STUDENT_COURSE_JOIN_NEW: &str = "/page/studentCourseJoin";
// Feedback pages whose front-end counterparts are still unmapped.
const LEGACY_STUDENT_FEEDBACK_SUBMISSION_EDIT: &str = "/page/studentFeedbackSubmissionEditPage";
const LEGACY_INSTRUCTOR_FEEDBACK_SUBMISSION_EDIT: &str =
    "/page/instructorFeedbackSubmissionEditPage";
const LEGACY_STUDENT_FEEDBACK_RESULTS: &str = "/page/studentFeedbackResultsPage";
const LEGACY_INSTRUCTOR_FEEDBACK_RESULTS: &str = "/page/instructorFeedbackResultsPage";

/// Query parameters carried by legacy links.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyQuery {
    /// Registration key forwarded to the join page.
    pub key: Option<String>,
}

fn join_redirect(registration_key: Option<&str>, entity_type: EntityType) -> String {
    let mut url = AppUrl::new(JOIN_PAGE);
    if let Some(key) = registration_key {
        url = url.with_registration_key(key);
    }
    url.with_entity_type(entity_type).to_relative()
}

/// Map a legacy path to its front-end URL.
///
/// Matrix parameters (`;jsessionid=...`) are stripped before lookup; any
/// path outside the fixed table falls back to the root path.
#[must_use]
pub fn legacy_redirect_url(path: &str, registration_key: Option<&str>) -> String {
    let path = path.split(';').next().unwrap_or(path);
    match path {
        LEGACY_INSTRUCTOR_COURSE_JOIN => {
            join_redirect(registration_key, EntityType::Instructor)
        }
        LEGACY_STUDENT_COURSE_JOIN | LEGACY_STUDENT_COURSE_JOIN_NEW => {
            join_redirect(registration_key, EntityType::Student)
        }
        LEGACY_STUDENT_FEEDBACK_SUBMISSION_EDIT
        | LEGACY_INSTRUCTOR_FEEDBACK_SUBMISSION_EDIT
        | LEGACY_STUDENT_FEEDBACK_RESULTS
        | LEGACY_INSTRUCTOR_FEEDBACK_RESULTS => "/".to_owned(),
        _ => "/".to_owned(),
    }
}

fn page_security_headers(mut builder: actix_web::HttpResponseBuilder) -> actix_web::HttpResponseBuilder {
    builder
        .insert_header((header::CONTENT_SECURITY_POLICY, CSP_POLICY))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .insert_header((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .insert_header(("X-XSS-Protection", "1; mode=block"))
        .insert_header((header::STRICT_TRANSPORT_SECURITY, STRICT_TRANSPORT_SECURITY));
    builder
}

/// Serve the single-page app shell for any front-end route.
#[get("/web/{path:.*}")]
pub async fn web_page() -> HttpResponse {
    page_security_headers(HttpResponse::Ok())
        .content_type("text/html; charset=utf-8")
        .body(APP_SHELL)
}

/// Redirect the bare root to the front-end landing page.
#[get("/")]
pub async fn home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, HOME_PAGE))
        .finish()
}

/// Redirect a legacy URL to its front-end counterpart.
#[get("/page/{path:.*}")]
pub async fn legacy_page(req: HttpRequest, query: web::Query<LegacyQuery>) -> HttpResponse {
    let target = legacy_redirect_url(req.path(), query.key.as_deref());
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::App;
    use rstest::rstest;

    #[rstest]
    #[case("/page/instructorCourseJoin", Some("reg-1"), "/web/join?key=reg-1&entitytype=instructor")]
    #[case("/page/studentCourseJoin", Some("reg-1"), "/web/join?key=reg-1&entitytype=student")]
    #[case(
        "/page/studentCourseJoinAuthenticated",
        Some("reg-1"),
        "/web/join?key=reg-1&entitytype=student"
    )]
    #[case("/page/instructorCourseJoin", None, "/web/join?entitytype=instructor")]
    #[case("/page/studentFeedbackSubmissionEditPage", Some("reg-1"), "/")]
    #[case("/page/instructorFeedbackResultsPage", None, "/")]
    #[case("/page/instructorHomePage", None, "/")]
    #[case("/page/definitely/not/mapped", None, "/")]
    fn the_mapping_table_is_fixed(
        #[case] path: &str,
        #[case] key: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(legacy_redirect_url(path, key), expected);
    }

    #[test]
    fn matrix_parameters_are_stripped_before_lookup() {
        assert_eq!(
            legacy_redirect_url("/page/studentCourseJoin;jsessionid=deadbeef", Some("k")),
            "/web/join?key=k&entitytype=student"
        );
    }

    #[actix_web::test]
    async fn legacy_requests_are_redirected() {
        let app = actix_test::init_service(App::new().service(legacy_page)).await;
        let req = actix_test::TestRequest::get()
            .uri("/page/instructorCourseJoin?key=reg-1")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/web/join?key=reg-1&entitytype=instructor")
        );
    }

    #[actix_web::test]
    async fn unmapped_legacy_requests_fall_back_to_the_root() {
        let app = actix_test::init_service(App::new().service(legacy_page)).await;
        let req = actix_test::TestRequest::get()
            .uri("/page/instructorHomePage")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/")
        );
    }

    #[actix_web::test]
    async fn the_app_shell_carries_the_page_security_headers() {
        let app = actix_test::init_service(App::new().service(web_page)).await;
        let req = actix_test::TestRequest::get().uri("/web/front/home").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert_eq!(
            headers
                .get(header::CONTENT_SECURITY_POLICY)
                .and_then(|value| value.to_str().ok()),
            Some(CSP_POLICY)
        );
        assert_eq!(
            headers
                .get(header::X_CONTENT_TYPE_OPTIONS)
                .and_then(|value| value.to_str().ok()),
            Some("nosniff")
        );
        assert_eq!(
            headers
                .get(header::X_FRAME_OPTIONS)
                .and_then(|value| value.to_str().ok()),
            Some("SAMEORIGIN")
        );
        assert_eq!(
            headers
                .get("X-XSS-Protection")
                .and_then(|value| value.to_str().ok()),
            Some("1; mode=block")
        );
        assert_eq!(
            headers
                .get(header::STRICT_TRANSPORT_SECURITY)
                .and_then(|value| value.to_str().ok()),
            Some(STRICT_TRANSPORT_SECURITY)
        );
    }

    #[actix_web::test]
    async fn the_root_redirects_to_the_landing_page() {
        let app = actix_test::init_service(App::new().service(home)).await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/web/front/home")
        );
    }
}
