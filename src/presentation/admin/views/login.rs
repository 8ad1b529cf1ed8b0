use askama::Template;

use super::AdminLayout;

#[derive(Clone)]
pub struct AdminLoginView {
    pub form_action: String,
    pub email: String,
    pub next: Option<String>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub view: AdminLayout<AdminLoginView>,
}
