use thiserror::Error;
use uuid::Uuid;

use crate::application::policy::AuthorizationError;
use crate::application::repos::RepoError;

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Forbidden(#[from] AuthorizationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}
