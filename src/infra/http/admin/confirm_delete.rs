use axum::{extract::Query, http::StatusCode, response::Response};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::application::admin::confirm_delete::CONFIRM_DELETE_PATH;
use crate::application::validation::{ConfirmDeleteInput, FieldErrors, validate_confirm_delete};
use crate::presentation::admin::views::{
    AdminConfirmDeleteContent, AdminConfirmDeleteTemplate, AdminConfirmDeleteView,
    AdminFieldErrorView,
};

use super::render_admin_page;
use crate::infra::http::session::CurrentUser;

pub(super) async fn admin_confirm_delete(
    CurrentUser(user): CurrentUser,
    jar: SignedCookieJar,
    Query(input): Query<ConfirmDeleteInput>,
) -> Response {
    let (content, status) = match validate_confirm_delete(&input) {
        Ok(payload) => (
            AdminConfirmDeleteContent::Ready(AdminConfirmDeleteView {
                prompt: payload.entity,
                id: payload.id,
                form_action: payload.form_action,
                cancel_href: payload.redirect,
            }),
            StatusCode::OK,
        ),
        Err(errors) => (
            AdminConfirmDeleteContent::Invalid(field_error_views(&errors)),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    };

    render_admin_page(jar, &user, CONFIRM_DELETE_PATH, content, status, |view| {
        AdminConfirmDeleteTemplate { view }
    })
}

fn field_error_views(errors: &FieldErrors) -> Vec<AdminFieldErrorView> {
    errors
        .iter()
        .flat_map(|(field, messages)| {
            messages.iter().map(move |message| AdminFieldErrorView {
                field: field.to_string(),
                message: message.clone(),
            })
        })
        .collect()
}
