//! Sign-in and sign-out.

use axum::{
    Router,
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::application::admin::chrome::admin_chrome;
use crate::application::auth::AuthError;
use crate::application::validation::is_local_path;
use crate::presentation::admin::views::{AdminLayout, AdminLoginTemplate, AdminLoginView};
use crate::presentation::views::render_template_response;

use super::admin::{AdminState, POSTS_PATH};
use super::auth_error_to_http;
use super::session::LOGIN_PATH;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub(super) fn build_auth_router(state: AdminState) -> Router {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/logout", post(logout))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct LoginQuery {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    next: Option<String>,
}

fn safe_next(next: Option<&str>) -> Option<String> {
    next.map(str::trim)
        .filter(|value| is_local_path(value))
        .map(str::to_string)
}

fn render_login(view: AdminLoginView, status: StatusCode) -> Response {
    let layout = AdminLayout::new(admin_chrome(LOGIN_PATH, None), view);
    render_template_response(AdminLoginTemplate { view: layout }, status)
}

async fn login_page(Query(query): Query<LoginQuery>) -> Response {
    render_login(
        AdminLoginView {
            form_action: LOGIN_PATH.to_string(),
            email: String::new(),
            next: safe_next(query.next.as_deref()),
            error: None,
        },
        StatusCode::OK,
    )
}

async fn login(
    State(state): State<AdminState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_next(form.next.as_deref());

    match state.auth.login(&form.email, &form.password).await {
        Ok(issued) => {
            let jar = state.session.start(jar, issued.token, issued.expires_at);
            let location = next.unwrap_or_else(|| POSTS_PATH.to_string());
            (jar, Redirect::to(&location)).into_response()
        }
        Err(AuthError::InvalidCredentials) => render_login(
            AdminLoginView {
                form_action: LOGIN_PATH.to_string(),
                email: form.email.trim().to_string(),
                next,
                error: Some(INVALID_CREDENTIALS.to_string()),
            },
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(err) => auth_error_to_http("infra::http::auth::login", err).into_response(),
    }
}

async fn logout(State(state): State<AdminState>, jar: SignedCookieJar) -> Response {
    if let Some(token) = state.session.token(&jar) {
        if let Err(err) = state.auth.logout(&token).await {
            return auth_error_to_http("infra::http::auth::logout", err).into_response();
        }
        info!(target = "quire::http::auth", "session closed");
    }

    let jar = state.session.end(jar);
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}
