#![allow(dead_code)]

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration as StdDuration;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use rand_core::OsRng;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tower::ServiceExt;
use url::form_urlencoded;
use uuid::Uuid;

use quire::application::admin::posts::AdminPostService;
use quire::application::auth::AuthService;
use quire::application::pagination::{OffsetPage, PageRequest};
use quire::application::repos::{
    CreatePostParams, CreateSessionParams, CreateUserParams, HealthRepo, PostsRepo,
    PostsWriteRepo, RepoError, SessionsRepo, UpdatePostParams, UsersRepo,
};
use quire::domain::entities::{AdminPostRow, PostRecord, SessionRecord, UserRecord};
use quire::domain::types::UserRole;
use quire::infra::http::{AdminState, App, SessionCookie, build_app};

pub const PASSWORD: &str = "correct horse battery";
pub const SESSION_COOKIE: &str = "quire_session";

/// In-memory stand-in for the Postgres repositories.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRecord>>,
    posts: Mutex<Vec<PostRecord>>,
    sessions: Mutex<Vec<SessionRecord>>,
    database_down: AtomicBool,
}

impl MemoryStore {
    pub fn set_database_down(&self, down: bool) {
        self.database_down.store(down, Ordering::SeqCst);
    }

    pub async fn seed_user(&self, email: &str, name: &str, role: UserRole) -> UserRecord {
        let now = OffsetDateTime::now_utc();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            password_hash: cheap_hash(PASSWORD),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().await.push(user.clone());
        user
    }

    /// Posts seeded later sort first, as with real creation times.
    pub async fn seed_post(&self, owner: &UserRecord, title: &str) -> PostRecord {
        let mut posts = self.posts.lock().await;
        let created_at =
            OffsetDateTime::now_utc() - Duration::hours(1) + Duration::seconds(posts.len() as i64);
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: format!("Body of {title}"),
            user_id: owner.id,
            created_at,
            updated_at: created_at,
        };
        posts.push(post.clone());
        post
    }

    pub async fn post(&self, id: Uuid) -> Option<PostRecord> {
        self.posts.lock().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn posts(&self) -> Vec<PostRecord> {
        self.posts.lock().await.clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn expire_sessions(&self) {
        let past = OffsetDateTime::now_utc() - Duration::minutes(1);
        for session in self.sessions.lock().await.iter_mut() {
            session.expires_at = past;
        }
    }
}

/// Argon2 with minimal cost; verification reads the parameters from the hash.
fn cheap_hash(password: &str) -> String {
    let params = Params::new(8, 1, 1, None).unwrap();
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    argon
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn list_admin_posts(
        &self,
        page: PageRequest,
    ) -> Result<OffsetPage<AdminPostRow>, RepoError> {
        let users = self.users.lock().await;
        let mut posts = self.posts.lock().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = posts.len() as u64;

        let items = posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|post| {
                let user_name = users
                    .iter()
                    .find(|user| user.id == post.user_id)
                    .map(|user| user.name.clone())
                    .unwrap_or_default();
                AdminPostRow {
                    id: post.id,
                    title: post.title,
                    content: post.content,
                    user_id: post.user_id,
                    user_name,
                    created_at: post.created_at,
                    updated_at: post.updated_at,
                }
            })
            .collect();

        Ok(OffsetPage::new(items, total, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.post(id).await)
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            content: params.content,
            user_id: params.user_id,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().await.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.content = params.content;
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UsersRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.users.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == params.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".into(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            name: params.name,
            role: params.role,
            password_hash: params.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl SessionsRepo for MemoryStore {
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<SessionRecord, RepoError> {
        let session = SessionRecord {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            token_hash: params.token_hash,
            created_at: OffsetDateTime::now_utc(),
            expires_at: params.expires_at,
        };
        self.sessions.lock().await.push(session.clone());
        Ok(session)
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &[u8],
    ) -> Result<Option<SessionRecord>, RepoError> {
        Ok(self
            .sessions
            .lock()
            .await
            .iter()
            .find(|s| s.token_hash == token_hash)
            .cloned())
    }

    async fn delete_by_token_hash(&self, token_hash: &[u8]) -> Result<(), RepoError> {
        self.sessions
            .lock()
            .await
            .retain(|s| s.token_hash != token_hash);
        Ok(())
    }

    async fn delete_expired(&self, now: OffsetDateTime) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|s| !s.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.database_down.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        Ok(())
    }
}

/// Drives the router in-process, carrying cookies between requests like a browser.
pub struct TestClient {
    app: App,
    pub store: Arc<MemoryStore>,
    cookies: BTreeMap<String, String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_per_page(20)
    }

    pub fn with_per_page(per_page: u32) -> Self {
        let store = Arc::new(MemoryStore::default());
        let auth = AuthService::new(store.clone(), store.clone(), StdDuration::from_secs(3600));
        let state = AdminState {
            posts: Arc::new(AdminPostService::new(store.clone(), store.clone())),
            auth: Arc::new(auth),
            health: store.clone(),
            session: SessionCookie {
                name: SESSION_COOKIE.to_string(),
                secure: false,
            },
            per_page: NonZeroU32::new(per_page).unwrap(),
            key: Key::generate(),
        };

        Self {
            app: build_app(state),
            store,
            cookies: BTreeMap::new(),
        }
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn forget_cookies(&mut self) {
        self.cookies.clear();
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if !self.cookies.is_empty() {
            let header_value = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, header_value.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();
        self.absorb_cookies(&response);

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn absorb_cookies(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let removed = value.is_empty() || raw.contains("Max-Age=0");
            if removed {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn form(&mut self, method: &str, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.form("POST", uri, fields).await
    }

    pub async fn login(&mut self, email: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", PASSWORD)])
            .await
    }

    /// Seeds a user with the given role and signs in as them.
    pub async fn sign_in_as(&mut self, role: UserRole) -> UserRecord {
        let email = format!("{}-{}@example.com", role.as_str(), Uuid::new_v4().simple());
        let user = self
            .store
            .seed_user(&email, &format!("{} user", role.display_name()), role)
            .await;
        let response = self.login(&email).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login failed");
        user
    }
}
