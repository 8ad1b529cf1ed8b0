use askama::Template;

use super::{AdminFieldErrorView, AdminLayout};

#[derive(Clone)]
pub struct AdminConfirmDeleteView {
    pub prompt: String,
    pub id: String,
    pub form_action: String,
    pub cancel_href: String,
}

/// Either the confirmation form or the reasons it cannot be shown.
#[derive(Clone)]
pub enum AdminConfirmDeleteContent {
    Ready(AdminConfirmDeleteView),
    Invalid(Vec<AdminFieldErrorView>),
}

#[derive(Template)]
#[template(path = "admin/confirm_delete.html")]
pub struct AdminConfirmDeleteTemplate {
    pub view: AdminLayout<AdminConfirmDeleteContent>,
}
