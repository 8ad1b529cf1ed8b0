mod admin;
mod auth;
mod flash;
mod middleware;
mod session;

pub use admin::{AdminState, build_admin_router};
pub use flash::{FLASH_COOKIE, FlashKind, FlashMessage};
pub use middleware::override_method;
pub use session::{CurrentUser, LOGIN_PATH, SessionCookie, session_key};

use crate::application::auth::AuthError;
use crate::application::error::ErrorReport;
use crate::application::error::HttpError;
use crate::application::repos::RepoError;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware as axum_middleware;
use axum::response::{IntoResponse, Response};
use tower::{Layer, util::MapRequestLayer};

/// The whole application, with method spoofing applied ahead of routing.
pub type App = tower::util::MapRequest<Router, fn(Request<Body>) -> Request<Body>>;

pub fn build_app(state: AdminState) -> App {
    let router = Router::new()
        .merge(auth::build_auth_router(state.clone()))
        .merge(build_admin_router(state))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context));

    MapRequestLayer::new(override_method as fn(Request<Body>) -> Request<Body>).layer(router)
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to a consistent HTTP error response.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::Duplicate { constraint } => {
            HttpError::new(source, StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::Pagination(p) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Invalid page",
            p.to_string(),
        ),
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::InvalidInput { message } => {
            HttpError::new(source, StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        RepoError::Integrity { message } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "Database timeout",
        ),
        RepoError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}

pub(crate) fn auth_error_to_http(source: &'static str, err: AuthError) -> HttpError {
    match err {
        AuthError::Repo(repo) => repo_error_to_http(source, repo),
        AuthError::InvalidCredentials | AuthError::Unauthenticated => HttpError::new(
            source,
            StatusCode::UNAUTHORIZED,
            "Authentication required",
            err.to_string(),
        ),
        other => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            &other,
        ),
    }
}
