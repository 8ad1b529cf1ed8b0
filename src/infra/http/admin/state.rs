use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::application::admin::posts::AdminPostService;
use crate::application::auth::AuthService;
use crate::application::repos::HealthRepo;
use crate::infra::http::session::SessionCookie;

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
    pub auth: Arc<AuthService>,
    pub health: Arc<dyn HealthRepo>,
    pub session: SessionCookie,
    pub per_page: NonZeroU32,
    pub key: Key,
}

impl FromRef<AdminState> for Key {
    fn from_ref(state: &AdminState) -> Self {
        state.key.clone()
    }
}
