//! Cookie-backed sessions for the admin area.

use axum::{
    extract::FromRequestParts,
    http::{Method, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use time::OffsetDateTime;
use tracing::warn;
use url::form_urlencoded;

use crate::application::auth::AuthError;
use crate::config::SessionSettings;
use crate::domain::entities::UserRecord;
use crate::infra::error::InfraError;

use super::admin::AdminState;
use super::auth_error_to_http;

pub const LOGIN_PATH: &str = "/login";

const SOURCE: &str = "infra::http::session::CurrentUser";

/// Name and flags of the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub secure: bool,
}

impl From<&SessionSettings> for SessionCookie {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            name: settings.cookie_name.clone(),
            secure: settings.secure_cookies,
        }
    }
}

impl SessionCookie {
    pub fn token(&self, jar: &SignedCookieJar) -> Option<String> {
        jar.get(&self.name).map(|cookie| cookie.value().to_string())
    }

    pub fn start(
        &self,
        jar: SignedCookieJar,
        token: String,
        expires_at: OffsetDateTime,
    ) -> SignedCookieJar {
        jar.add(
            Cookie::build((self.name.clone(), token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(self.secure)
                .expires(expires_at),
        )
    }

    pub fn end(&self, jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build((self.name.clone(), "")).path("/"))
    }
}

/// Signing key for session and flash cookies. Without a configured secret a
/// random key is used, so sessions end with the process.
pub fn session_key(settings: &SessionSettings) -> Result<Key, InfraError> {
    match settings.secret.as_deref() {
        Some(secret) => Key::try_from(secret.as_bytes())
            .map_err(|err| InfraError::configuration(format!("session secret rejected: {err}"))),
        None => {
            warn!(
                target = "quire::http::session",
                "no session secret configured; sessions will not survive a restart"
            );
            Ok(Key::generate())
        }
    }
}

/// The signed-in user. Requests without a live session are sent to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl FromRequestParts<AdminState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AdminState,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.key.clone());
        let Some(token) = state.session.token(&jar) else {
            return Err(login_redirect(&parts.method, &parts.uri));
        };

        match state.auth.authenticate(&token).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(AuthError::Unauthenticated) => Err(login_redirect(&parts.method, &parts.uri)),
            Err(err) => Err(auth_error_to_http(SOURCE, err).into_response()),
        }
    }
}

/// `/login?next=<path>` for page loads; other methods cannot be replayed, so
/// they get the bare login page.
pub fn login_redirect(method: &Method, uri: &Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    let next = uri
        .path_and_query()
        .map(|value| value.as_str())
        .unwrap_or_else(|| uri.path());
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    Redirect::to(&format!("{LOGIN_PATH}?{query}")).into_response()
}
