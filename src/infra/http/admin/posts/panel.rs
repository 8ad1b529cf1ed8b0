use crate::application::admin::confirm_delete::{
    ConfirmDeleteLink, confirm_delete_link, delete_prompt,
};
use crate::application::pagination::{FIRST_PAGE, OffsetPage, PageLinks};
use crate::application::policy::{Ability, allows};
use crate::domain::entities::{AdminPostRow, UserRecord};
use crate::presentation::admin::views::{
    AdminPageLinkView, AdminPaginationView, AdminPostListView, AdminPostRowView,
};
use crate::presentation::views::format_timestamp;

use super::super::POSTS_PATH;

pub(super) fn build_post_list_view(
    user: &UserRecord,
    page: OffsetPage<AdminPostRow>,
) -> AdminPostListView {
    let pagination = build_pagination(&page);
    let posts = page.items.iter().map(build_row).collect();

    AdminPostListView {
        heading: "Posts".to_string(),
        posts,
        new_post_href: allows(user, Ability::AdminCreatePost)
            .then(|| format!("{POSTS_PATH}/create")),
        pagination,
        empty_message: if page.page > FIRST_PAGE {
            "There are no posts on this page.".to_string()
        } else {
            "No posts yet.".to_string()
        },
    }
}

fn build_row(row: &AdminPostRow) -> AdminPostRowView {
    let delete_link = ConfirmDeleteLink {
        id: row.id.to_string(),
        title: delete_prompt(&row.title),
        form_action: format!("{POSTS_PATH}/{}?_method=DELETE", row.id),
        return_url: POSTS_PATH.to_string(),
    };

    AdminPostRowView {
        id: row.id.to_string(),
        title: row.title.clone(),
        author: row.user_name.clone(),
        updated_at: format_timestamp(row.updated_at),
        edit_href: format!("{POSTS_PATH}/{}/edit", row.id),
        delete_href: confirm_delete_link(&delete_link),
    }
}

fn build_pagination<T>(page: &OffsetPage<T>) -> Option<AdminPaginationView> {
    if !page.has_pages() && page.page == FIRST_PAGE {
        return None;
    }

    let links = PageLinks::new(POSTS_PATH);
    let last_page = page.last_page();
    let pages = links
        .range(last_page)
        .into_iter()
        .map(|(number, href)| AdminPageLinkView {
            number,
            href,
            is_current: number == page.page,
        })
        .collect();

    Some(AdminPaginationView {
        previous_href: page.previous_page().map(|number| links.url_for(number)),
        next_href: page.next_page().map(|number| links.url_for(number)),
        pages,
        summary: format!(
            "Page {} of {} ({} posts)",
            page.page, last_page, page.total
        ),
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::application::pagination::PageRequest;
    use crate::domain::types::UserRole;

    fn user(role: UserRole) -> UserRecord {
        let now = OffsetDateTime::now_utc();
        UserRecord {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            name: "Someone".into(),
            role,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn row(title: &str) -> AdminPostRow {
        let now = OffsetDateTime::now_utc();
        AdminPostRow {
            id: Uuid::new_v4(),
            title: title.into(),
            content: "body".into(),
            user_id: Uuid::new_v4(),
            user_name: "Ada".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn page_of(items: Vec<AdminPostRow>, total: u64, page: u32) -> OffsetPage<AdminPostRow> {
        let request = PageRequest::new(page, NonZeroU32::new(20).unwrap()).unwrap();
        OffsetPage::new(items, total, request)
    }

    #[test]
    fn rows_link_to_edit_and_confirm_delete() {
        let post = row("Hello");
        let id = post.id;
        let view = build_post_list_view(&user(UserRole::Editor), page_of(vec![post], 1, 1));

        let row = &view.posts[0];
        assert_eq!(row.edit_href, format!("/admin/posts/{id}/edit"));
        assert!(row.delete_href.starts_with("/admin/confirm-delete?entity="));
        assert!(row.delete_href.contains(&format!("id={id}")));
        assert!(row.delete_href.contains("redirect=%2Fadmin%2Fposts"));
        assert_eq!(row.author, "Ada");
        assert!(view.pagination.is_none());
        assert_eq!(view.new_post_href.as_deref(), Some("/admin/posts/create"));
    }

    #[test]
    fn members_get_no_new_post_link() {
        let view = build_post_list_view(&user(UserRole::Member), page_of(Vec::new(), 0, 1));
        assert!(view.new_post_href.is_none());
        assert!(!view.has_posts());
    }

    #[test]
    fn pagination_marks_current_page() {
        let view = build_post_list_view(&user(UserRole::Admin), page_of(vec![row("a")], 45, 2));
        let pagination = view.pagination.unwrap();
        assert_eq!(pagination.pages.len(), 3);
        assert!(pagination.pages[1].is_current);
        assert_eq!(
            pagination.previous_href.as_deref(),
            Some("/admin/posts?page=1")
        );
        assert_eq!(pagination.next_href.as_deref(), Some("/admin/posts?page=3"));
    }

    #[test]
    fn page_past_the_end_keeps_navigation() {
        let view = build_post_list_view(&user(UserRole::Admin), page_of(Vec::new(), 3, 4));
        assert!(view.posts.is_empty());
        let pagination = view.pagination.unwrap();
        assert_eq!(pagination.next_href, None);
        assert_eq!(
            pagination.previous_href.as_deref(),
            Some("/admin/posts?page=1")
        );
    }
}
