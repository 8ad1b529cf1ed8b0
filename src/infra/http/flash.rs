//! One-shot notifications carried across a redirect in a signed cookie.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};

use crate::presentation::admin::views::AdminFlashView;

pub const FLASH_COOKIE: &str = "quire_flash";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    #[default]
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub notification: String,
    #[serde(default)]
    pub kind: FlashKind,
}

impl FlashMessage {
    pub fn success(notification: impl Into<String>) -> Self {
        Self {
            notification: notification.into(),
            kind: FlashKind::Success,
        }
    }

    pub fn error(notification: impl Into<String>) -> Self {
        Self {
            notification: notification.into(),
            kind: FlashKind::Error,
        }
    }

    pub fn into_view(self) -> AdminFlashView {
        AdminFlashView {
            kind: self.kind.as_str(),
            text: self.notification,
        }
    }
}

pub fn push_flash(jar: SignedCookieJar, message: &FlashMessage) -> SignedCookieJar {
    match serde_json::to_string(message) {
        Ok(value) => jar.add(
            Cookie::build((FLASH_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        Err(err) => {
            tracing::warn!(
                target = "quire::http::flash",
                error = %err,
                "failed to encode flash message"
            );
            jar
        }
    }
}

/// Reads the pending message, if any, and schedules its removal.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<FlashMessage>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let message = serde_json::from_str::<FlashMessage>(cookie.value()).ok();
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, message)
}
