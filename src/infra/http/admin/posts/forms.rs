use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdminPostListQuery {
    #[serde(default)]
    pub(crate) page: Option<String>,
}

/// Route ids that are not UUIDs cannot name a post.
pub(super) fn parse_post_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
