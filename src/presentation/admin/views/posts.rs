use askama::Template;

use super::AdminLayout;

#[derive(Clone)]
pub struct AdminPostRowView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub updated_at: String,
    pub edit_href: String,
    pub delete_href: String,
}

#[derive(Clone)]
pub struct AdminPageLinkView {
    pub number: u32,
    pub href: String,
    pub is_current: bool,
}

#[derive(Clone)]
pub struct AdminPaginationView {
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<AdminPageLinkView>,
    pub summary: String,
}

#[derive(Clone)]
pub struct AdminPostListView {
    pub heading: String,
    pub posts: Vec<AdminPostRowView>,
    pub new_post_href: Option<String>,
    pub pagination: Option<AdminPaginationView>,
    pub empty_message: String,
}

impl AdminPostListView {
    pub fn has_posts(&self) -> bool {
        !self.posts.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub view: AdminLayout<AdminPostListView>,
}

/// Create and edit share one form; only the action and labels differ.
#[derive(Clone)]
pub struct AdminPostFormView {
    pub heading: String,
    pub form_action: String,
    pub submit_label: String,
    pub cancel_href: String,
    pub id: String,
    pub title: String,
    pub content: String,
    pub id_error: Option<String>,
    pub title_error: Option<String>,
    pub content_error: Option<String>,
}

impl AdminPostFormView {
    pub fn has_errors(&self) -> bool {
        self.id_error.is_some() || self.title_error.is_some() || self.content_error.is_some()
    }
}

#[derive(Template)]
#[template(path = "admin/post_form.html")]
pub struct AdminPostFormTemplate {
    pub view: AdminLayout<AdminPostFormView>,
}
