use tracing::info;
use uuid::Uuid;

use crate::application::policy::{Ability, authorize};
use crate::application::repos::{CreatePostParams, RepoError, UpdatePostParams};
use crate::domain::entities::{PostRecord, UserRecord};

use super::service::AdminPostService;
use super::types::{AdminPostError, CreatePostCommand, UpdatePostCommand};

impl AdminPostService {
    /// Creates a post owned by `actor`.
    pub async fn create_post(
        &self,
        actor: &UserRecord,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        authorize(actor, Ability::AdminCreatePost)?;

        let post = self
            .writer
            .create_post(CreatePostParams {
                title: command.title,
                content: command.content,
                user_id: actor.id,
            })
            .await?;

        info!(
            target = "application::admin::posts::create_post",
            post_id = %post.id,
            user_id = %actor.id,
            "post created"
        );
        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &UserRecord,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let existing = self.find_or_fail(command.id).await?;
        authorize(actor, Ability::AdminEditPost(&existing))?;

        let post = self
            .writer
            .update_post(UpdatePostParams {
                id: existing.id,
                title: command.title,
                content: command.content,
            })
            .await
            .map_err(not_found_or_repo)?;

        info!(
            target = "application::admin::posts::update_post",
            post_id = %post.id,
            user_id = %actor.id,
            "post updated"
        );
        Ok(post)
    }

    pub async fn delete_post(&self, actor: &UserRecord, id: Uuid) -> Result<(), AdminPostError> {
        let existing = self.find_or_fail(id).await?;
        authorize(actor, Ability::AdminDeletePost(&existing))?;

        self.writer
            .delete_post(existing.id)
            .await
            .map_err(not_found_or_repo)?;

        info!(
            target = "application::admin::posts::delete_post",
            post_id = %existing.id,
            user_id = %actor.id,
            "post deleted"
        );
        Ok(())
    }
}

fn not_found_or_repo(err: RepoError) -> AdminPostError {
    match err {
        RepoError::NotFound => AdminPostError::NotFound,
        other => AdminPostError::Repo(other),
    }
}
