use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{AdminPostRow, PostRecord};

pub(crate) const POST_COLUMNS: &str = "id, title, content, user_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) user_id: Uuid,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AdminPostListRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) user_id: Uuid,
    pub(crate) user_name: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
    pub(crate) total_count: i64,
}

impl From<AdminPostListRow> for AdminPostRow {
    fn from(row: AdminPostListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            user_id: row.user_id,
            user_name: row.user_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
