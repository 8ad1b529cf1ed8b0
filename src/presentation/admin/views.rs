mod confirm_delete;
mod login;
mod posts;

pub use confirm_delete::*;
pub use login::*;
pub use posts::*;

#[derive(Clone)]
pub struct AdminBrandView {
    pub title: String,
}

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminNavigationView {
    pub items: Vec<AdminNavigationItemView>,
}

#[derive(Clone)]
pub struct AdminMetaView {
    pub title: String,
    pub description: String,
}

/// The signed-in user as shown in the header.
#[derive(Clone)]
pub struct AdminUserView {
    pub name: String,
    pub role_label: &'static str,
    pub logout_action: String,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub brand: AdminBrandView,
    pub navigation: AdminNavigationView,
    pub meta: AdminMetaView,
    pub user: Option<AdminUserView>,
}

#[derive(Clone)]
pub struct AdminFlashView {
    pub kind: &'static str,
    pub text: String,
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub asset_version: String,
    pub flash: Option<AdminFlashView>,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self {
            chrome,
            asset_version: asset_version(),
            flash: None,
            content,
        }
    }

    pub fn with_flash(mut self, flash: Option<AdminFlashView>) -> Self {
        self.flash = flash;
        self
    }
}

fn asset_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Clone)]
pub struct AdminFieldErrorView {
    pub field: String,
    pub message: String,
}
