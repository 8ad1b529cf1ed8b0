use uuid::Uuid;

use crate::application::pagination::{OffsetPage, PageRequest};
use crate::application::policy::{Ability, authorize};
use crate::domain::entities::{AdminPostRow, PostRecord, UserRecord};

use super::service::AdminPostService;
use super::types::AdminPostError;

impl AdminPostService {
    pub async fn list(
        &self,
        actor: &UserRecord,
        page: PageRequest,
    ) -> Result<OffsetPage<AdminPostRow>, AdminPostError> {
        authorize(actor, Ability::AdminListPosts)?;
        self.reader
            .list_admin_posts(page)
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn load_post(&self, id: Uuid) -> Result<Option<PostRecord>, AdminPostError> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn find_or_fail(&self, id: Uuid) -> Result<PostRecord, AdminPostError> {
        self.load_post(id).await?.ok_or(AdminPostError::NotFound)
    }

    /// The post behind the edit form, once the actor may edit it.
    pub async fn load_for_edit(
        &self,
        actor: &UserRecord,
        id: Uuid,
    ) -> Result<PostRecord, AdminPostError> {
        let post = self.find_or_fail(id).await?;
        authorize(actor, Ability::AdminEditPost(&post))?;
        Ok(post)
    }

    pub fn authorize_create(&self, actor: &UserRecord) -> Result<(), AdminPostError> {
        authorize(actor, Ability::AdminCreatePost).map_err(AdminPostError::from)
    }
}
