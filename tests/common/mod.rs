#![allow(dead_code)]

//! Shared test fixtures: in-memory repository fakes and a wired-up service.
//!
//! The fakes honor the same contracts as the Postgres adapters (unique email
//! on insert, newest-first pagination, mirror maintenance) so surface-level
//! tests can exercise the full use cases without a database.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use publish_service::auth::{Identity, TokenService};
use publish_service::db::{NewPost, NewUser, PostRepository, UserRepository};
use publish_service::error::{AppError, Result};
use publish_service::models::{Post, User};
use publish_service::services::{AssetStore, ContentService};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, new: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Err(AppError::Conflict(
                "Email address already registered.".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            status: "I am new!".to_string(),
            post_ids: vec![],
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.status = status.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn add_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        user.post_ids.push(post_id);
        Ok(())
    }

    async fn remove_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        user.post_ids.retain(|id| *id != post_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPosts {
    posts: Mutex<Vec<Post>>,
    seq: AtomicI64,
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn insert(&self, new: NewPost) -> Result<Post> {
        // Strictly increasing timestamps so newest-first ordering is stable
        // even for back-to-back inserts.
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now() + Duration::milliseconds(seq);
        let post = Post {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            image_url: new.image_url,
            creator: new.creator,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.posts.lock().unwrap().len() as i64)
    }

    async fn update(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        image_url: &str,
    ) -> Result<Option<Post>> {
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.title = title.to_string();
        post.content = content.to_string();
        post.image_url = image_url.to_string();
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }
}

/// Records released references instead of touching a filesystem
#[derive(Default)]
pub struct RecordingAssets {
    released: Mutex<Vec<String>>,
}

impl RecordingAssets {
    pub fn released(&self) -> Vec<String> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for RecordingAssets {
    async fn release(&self, reference: &str) {
        self.released.lock().unwrap().push(reference.to_string());
    }
}

pub struct TestBackend {
    pub users: Arc<InMemoryUsers>,
    pub posts: Arc<InMemoryPosts>,
    pub assets: Arc<RecordingAssets>,
    pub tokens: Arc<TokenService>,
    pub service: Arc<ContentService>,
}

pub fn backend() -> TestBackend {
    let users = Arc::new(InMemoryUsers::default());
    let posts = Arc::new(InMemoryPosts::default());
    let assets = Arc::new(RecordingAssets::default());
    let tokens = Arc::new(TokenService::new("test-secret", 3600));
    let service = Arc::new(ContentService::new(
        users.clone(),
        posts.clone(),
        assets.clone(),
        tokens.clone(),
        false,
    ));

    TestBackend {
        users,
        posts,
        assets,
        tokens,
        service,
    }
}

/// Sign up and log in, returning the authenticated identity
pub async fn signed_up(backend: &TestBackend, email: &str, name: &str) -> Identity {
    backend
        .service
        .signup(publish_service::requests::SignupRequest {
            email: email.to_string(),
            password: "secret1".to_string(),
            name: name.to_string(),
        })
        .await
        .expect("signup should succeed");

    let payload = backend
        .service
        .login(publish_service::requests::LoginRequest {
            email: email.to_string(),
            password: "secret1".to_string(),
        })
        .await
        .expect("login should succeed");

    Identity::authenticated(payload.user_id, email)
}
