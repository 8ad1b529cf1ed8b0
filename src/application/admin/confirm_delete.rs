//! Links into the shared delete confirmation page.

use url::form_urlencoded;

pub const CONFIRM_DELETE_PATH: &str = "/admin/confirm-delete";

/// What the confirmation page should ask, and where its buttons lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDeleteLink {
    pub id: String,
    /// Prompt shown to the user; travels as the `entity` parameter.
    pub title: String,
    pub form_action: String,
    pub return_url: String,
}

pub fn confirm_delete_link(link: &ConfirmDeleteLink) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("entity", &link.title)
        .append_pair("id", &link.id)
        .append_pair("formAction", &link.form_action)
        .append_pair("redirect", &link.return_url)
        .finish();
    format!("{CONFIRM_DELETE_PATH}?{query}")
}

pub fn delete_prompt(title: &str) -> String {
    format!("Are you sure you want to delete \"{title}\" ?")
}
