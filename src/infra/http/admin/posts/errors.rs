use axum::http::StatusCode;

use crate::application::{admin::posts::AdminPostError, error::HttpError};
use crate::infra::http::repo_error_to_http;

pub(super) fn admin_post_error(source: &'static str, err: AdminPostError) -> HttpError {
    match err {
        AdminPostError::NotFound => post_not_found(source, "post does not exist"),
        AdminPostError::Forbidden(denied) => HttpError::from_error(
            source,
            StatusCode::FORBIDDEN,
            "Not authorized to perform this action",
            &denied,
        ),
        AdminPostError::Repo(repo) => repo_error_to_http(source, repo),
    }
}

pub(super) fn post_not_found(source: &'static str, detail: impl Into<String>) -> HttpError {
    HttpError::new(source, StatusCode::NOT_FOUND, "Post not found", detail)
}
