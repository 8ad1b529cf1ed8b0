use crate::domain::entities::UserRecord;
use crate::presentation::admin::views::{
    AdminBrandView, AdminChrome, AdminMetaView, AdminNavigationItemView, AdminNavigationView,
    AdminUserView,
};

const BRAND_TITLE: &str = "Quire Admin";
const LOGOUT_ACTION: &str = "/logout";
const NAV_ITEMS: &[(&str, &str)] = &[("/admin/posts", "Posts")];

/// Header, navigation and page title for an admin page at `active_path`.
pub fn admin_chrome(active_path: &str, user: Option<&UserRecord>) -> AdminChrome {
    let brand = AdminBrandView {
        title: BRAND_TITLE.to_string(),
    };

    let items: Vec<AdminNavigationItemView> = if user.is_some() {
        NAV_ITEMS
            .iter()
            .map(|(href, label)| AdminNavigationItemView {
                label: (*label).to_string(),
                href: (*href).to_string(),
                is_active: is_within(active_path, href),
            })
            .collect()
    } else {
        Vec::new()
    };
    let navigation = AdminNavigationView { items };

    let active_label = navigation
        .items
        .iter()
        .find(|item| item.is_active)
        .map(|item| item.label.as_str())
        .unwrap_or(if user.is_some() { "Admin" } else { "Sign in" });

    let meta = AdminMetaView {
        title: format!("{} · {}", brand.title, active_label),
        description: "Content administration".to_string(),
    };

    AdminChrome {
        brand,
        navigation,
        meta,
        user: user.map(|user| AdminUserView {
            name: user.name.clone(),
            role_label: user.role.display_name(),
            logout_action: LOGOUT_ACTION.to_string(),
        }),
    }
}

fn is_within(path: &str, section: &str) -> bool {
    path == section
        || path
            .strip_prefix(section)
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::domain::types::UserRole;

    fn editor() -> UserRecord {
        let now = OffsetDateTime::now_utc();
        UserRecord {
            id: Uuid::new_v4(),
            email: "ed@example.com".into(),
            name: "Ed".into(),
            role: UserRole::Editor,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn marks_posts_section_active() {
        let user = editor();
        let chrome = admin_chrome("/admin/posts/123/edit", Some(&user));
        assert!(chrome.navigation.items[0].is_active);
        assert_eq!(chrome.meta.title, "Quire Admin · Posts");
        let header = chrome.user.unwrap();
        assert_eq!(header.name, "Ed");
        assert_eq!(header.role_label, "Editor");
    }

    #[test]
    fn anonymous_chrome_has_no_navigation() {
        let chrome = admin_chrome("/login", None);
        assert!(chrome.navigation.items.is_empty());
        assert!(chrome.user.is_none());
        assert_eq!(chrome.meta.title, "Quire Admin · Sign in");
    }

    #[test]
    fn section_prefix_must_end_at_segment() {
        assert!(is_within("/admin/posts", "/admin/posts"));
        assert!(is_within("/admin/posts?page=2", "/admin/posts"));
        assert!(!is_within("/admin/postscript", "/admin/posts"));
    }
}
