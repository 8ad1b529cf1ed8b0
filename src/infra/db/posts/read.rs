use async_trait::async_trait;
use uuid::Uuid;

use crate::application::pagination::{OffsetPage, PageRequest};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::{AdminPostRow, PostRecord};

use super::PostgresRepositories;
use super::types::{AdminPostListRow, POST_COLUMNS, PostRow};
use crate::infra::db::map_sqlx_error;
use crate::infra::db::util::{convert_bound, convert_count};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_admin_posts(
        &self,
        page: PageRequest,
    ) -> Result<OffsetPage<AdminPostRow>, RepoError> {
        let limit = convert_bound(page.limit())?;
        let offset = convert_bound(page.offset())?;

        let rows = sqlx::query_as::<_, AdminPostListRow>(
            r#"
            SELECT p.id, p.title, p.content, p.user_id, u.name AS user_name,
                   p.created_at, p.updated_at,
                   COUNT(*) OVER () AS total_count
            FROM posts p
            INNER JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        // A page past the end carries no window count.
        let total = match rows.first() {
            Some(row) => convert_count(row.total_count)?,
            None => self.count_posts().await?,
        };

        let items = rows.into_iter().map(AdminPostRow::from).collect();
        Ok(OffsetPage::new(items, total, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }
}

impl PostgresRepositories {
    async fn count_posts(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        convert_count(count)
    }
}
