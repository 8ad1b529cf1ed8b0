//! Role based abilities for the admin area.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{PostRecord, UserRecord};
use crate::domain::types::UserRole;

#[derive(Debug, Clone, Copy)]
pub enum Ability<'a> {
    AdminListPosts,
    AdminCreatePost,
    AdminEditPost(&'a PostRecord),
    AdminDeletePost(&'a PostRecord),
}

impl Ability<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Ability::AdminListPosts => "admin_list_posts",
            Ability::AdminCreatePost => "admin_create_post",
            Ability::AdminEditPost(_) => "admin_edit_post",
            Ability::AdminDeletePost(_) => "admin_delete_post",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("user {user_id} may not {ability}")]
pub struct AuthorizationError {
    pub user_id: Uuid,
    pub ability: &'static str,
}

pub fn allows(user: &UserRecord, ability: Ability<'_>) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Editor => match ability {
            Ability::AdminListPosts | Ability::AdminCreatePost => true,
            Ability::AdminEditPost(post) | Ability::AdminDeletePost(post) => user.owns(post),
        },
        UserRole::Member => false,
    }
}

pub fn authorize(user: &UserRecord, ability: Ability<'_>) -> Result<(), AuthorizationError> {
    if allows(user, ability) {
        Ok(())
    } else {
        Err(AuthorizationError {
            user_id: user.id,
            ability: ability.name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn user(role: UserRole) -> UserRecord {
        let now = OffsetDateTime::now_utc();
        UserRecord {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", role.as_str()),
            name: role.display_name().to_string(),
            role,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn post_of(owner: &UserRecord) -> PostRecord {
        let now = OffsetDateTime::now_utc();
        PostRecord {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            content: "World".into(),
            user_id: owner.id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admin_may_do_everything() {
        let admin = user(UserRole::Admin);
        let other = user(UserRole::Editor);
        let post = post_of(&other);

        assert!(allows(&admin, Ability::AdminListPosts));
        assert!(allows(&admin, Ability::AdminCreatePost));
        assert!(allows(&admin, Ability::AdminEditPost(&post)));
        assert!(allows(&admin, Ability::AdminDeletePost(&post)));
    }

    #[test]
    fn editor_is_limited_to_own_posts() {
        let editor = user(UserRole::Editor);
        let own = post_of(&editor);
        let foreign = post_of(&user(UserRole::Admin));

        assert!(allows(&editor, Ability::AdminListPosts));
        assert!(allows(&editor, Ability::AdminCreatePost));
        assert!(allows(&editor, Ability::AdminEditPost(&own)));
        assert!(allows(&editor, Ability::AdminDeletePost(&own)));
        assert!(!allows(&editor, Ability::AdminEditPost(&foreign)));
        assert!(!allows(&editor, Ability::AdminDeletePost(&foreign)));
    }

    #[test]
    fn member_is_denied() {
        let member = user(UserRole::Member);
        let own = post_of(&member);

        assert!(!allows(&member, Ability::AdminListPosts));
        assert!(!allows(&member, Ability::AdminCreatePost));
        assert!(!allows(&member, Ability::AdminEditPost(&own)));

        let err = authorize(&member, Ability::AdminDeletePost(&own)).unwrap_err();
        assert_eq!(err.user_id, member.id);
        assert_eq!(err.ability, "admin_delete_post");
    }
}
