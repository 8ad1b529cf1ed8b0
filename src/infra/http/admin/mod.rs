mod confirm_delete;
mod health;
mod posts;
mod state;

pub use state::AdminState;

use askama::Template;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, put},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::application::admin::chrome::admin_chrome;
use crate::domain::entities::UserRecord;
use crate::presentation::admin::views::AdminLayout;
use crate::presentation::views::render_template_response;

use super::flash::{FlashMessage, push_flash, take_flash};
use super::session::CurrentUser;

pub(crate) const POSTS_PATH: &str = "/admin/posts";

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin", get(admin_home))
        .route(
            POSTS_PATH,
            get(posts::admin_posts).post(posts::admin_post_store),
        )
        .route("/admin/posts/create", get(posts::admin_post_create))
        .route("/admin/posts/{id}/edit", get(posts::admin_post_edit))
        .route(
            "/admin/posts/{id}",
            put(posts::admin_post_update)
                .patch(posts::admin_post_update)
                .delete(posts::admin_post_destroy),
        )
        .route(
            "/admin/confirm-delete",
            get(confirm_delete::admin_confirm_delete),
        )
        .route("/_health/db", get(health::admin_health))
        .with_state(state)
}

async fn admin_home(_user: CurrentUser) -> Redirect {
    Redirect::to(POSTS_PATH)
}

/// Renders an admin page, consuming any pending flash message.
pub(super) fn render_admin_page<C, T>(
    jar: SignedCookieJar,
    user: &UserRecord,
    active_path: &str,
    content: C,
    status: StatusCode,
    template: impl FnOnce(AdminLayout<C>) -> T,
) -> Response
where
    T: Template,
{
    let (jar, flash) = take_flash(jar);
    let view = AdminLayout::new(admin_chrome(active_path, Some(user)), content)
        .with_flash(flash.map(FlashMessage::into_view));
    (jar, render_template_response(template(view), status)).into_response()
}

pub(super) fn redirect_with_flash(
    jar: SignedCookieJar,
    location: &str,
    message: FlashMessage,
) -> Response {
    (push_flash(jar, &message), Redirect::to(location)).into_response()
}
