/// Content service: the authenticated content-management use cases
///
/// Both API surfaces call into this one orchestrator, so validation,
/// authentication and ownership checks live here and nowhere else. The
/// ordering rules are strict: authentication first, then validation, and no
/// mutating store call before both have passed. Relationship-mirror writes
/// that fail after a primary write has committed are logged as fatal
/// inconsistencies and never turned into a caller-visible error.
use crate::auth::{password, Identity, TokenService};
use crate::db::{NewPost, NewUser, PostRepository, UserRepository};
use crate::error::{AppError, FieldError, Result};
use crate::models::{AuthPayload, Post, PostPage, PublicUser};
use crate::requests::{
    self, CreatePostRequest, EditPostRequest, LoginRequest, SignupRequest, UpdateStatusRequest,
};
use crate::services::AssetStore;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateUrl;

/// Fixed page size for post listings
pub const POSTS_PER_PAGE: i64 = 2;

pub struct ContentService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    assets: Arc<dyn AssetStore>,
    tokens: Arc<TokenService>,
    strict_image_urls: bool,
}

impl ContentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        assets: Arc<dyn AssetStore>,
        tokens: Arc<TokenService>,
        strict_image_urls: bool,
    ) -> Self {
        Self {
            users,
            posts,
            assets,
            tokens,
            strict_image_urls,
        }
    }

    /// Register a new user with the default status line
    pub async fn signup(&self, request: SignupRequest) -> Result<PublicUser> {
        let request = request.normalized();
        requests::check(&request)?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(
                "Email address already registered.".to_string(),
            ));
        }

        let password_hash = password::hash_password(&request.password)?;
        let user = self
            .users
            .insert(NewUser {
                email: request.email,
                password_hash,
                name: request.name,
            })
            .await?;

        Ok(user.into())
    }

    /// Verify credentials and issue a token bound to the user
    ///
    /// Unknown email and wrong password return the identical generic error so
    /// the endpoint cannot be used to enumerate accounts.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthPayload> {
        let email = requests::normalize_email(&request.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AppError::Unauthenticated);
        };
        if !password::verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthenticated);
        }

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthPayload {
            token,
            user_id: user.id,
        })
    }

    pub async fn get_status(&self, identity: &Identity) -> Result<String> {
        let user_id = identity.require()?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user.status)
    }

    pub async fn update_status(
        &self,
        identity: &Identity,
        request: UpdateStatusRequest,
    ) -> Result<String> {
        let user_id = identity.require()?;
        requests::check(&request)?;

        let user = self
            .users
            .update_status(user_id, &request.status)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user.status)
    }

    /// Create a post owned by the caller, then mirror it onto the owner
    pub async fn create_post(
        &self,
        identity: &Identity,
        request: CreatePostRequest,
    ) -> Result<Post> {
        let user_id = identity.require()?;

        let mut issues = requests::collect(&request);
        self.check_image_reference(&request.image_url, &mut issues);
        if !issues.is_empty() {
            return Err(AppError::Validation(issues));
        }

        let post = self
            .posts
            .insert(NewPost {
                title: request.title,
                content: request.content,
                image_url: request.image_url,
                creator: user_id,
            })
            .await?;

        // The mirror write is a second, non-atomic store call. If it fails the
        // post has already committed and is returned anyway; the orphan window
        // is logged here and reconciled out of band.
        if let Err(err) = self.users.add_post(user_id, post.id).await {
            tracing::error!(
                post_id = %post.id,
                user_id = %user_id,
                "fatal inconsistency: post created but owner's post list not updated: {}",
                err
            );
        }

        Ok(post)
    }

    /// Read access is not owner-restricted
    pub async fn get_post(&self, identity: &Identity, post_id: Uuid) -> Result<Post> {
        identity.require()?;

        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))
    }

    /// List posts newest first. `page` defaults to 1 and non-positive pages
    /// behave as the first page.
    pub async fn list_posts(&self, identity: &Identity, page: Option<i64>) -> Result<PostPage> {
        identity.require()?;

        // Saturate rather than trust the caller-supplied page: an offset past
        // the last row just yields an empty page.
        let page = page.unwrap_or(1).max(1);
        let offset = (page - 1).saturating_mul(POSTS_PER_PAGE);
        let total_items = self.posts.count().await?;
        let posts = self.posts.page(POSTS_PER_PAGE, offset).await?;

        Ok(PostPage { posts, total_items })
    }

    /// Edit an owned post. A replaced image reference is released only after
    /// the new reference has validated and the update has committed, and only
    /// when it actually changed.
    pub async fn edit_post(
        &self,
        identity: &Identity,
        post_id: Uuid,
        request: EditPostRequest,
    ) -> Result<Post> {
        let user_id = identity.require()?;

        let mut issues = requests::collect(&request);
        if let Some(reference) = request.image_url.as_deref() {
            if reference.trim().is_empty() {
                issues.push(FieldError {
                    field: "imageUrl".to_string(),
                    message: "image reference must not be empty".to_string(),
                });
            } else {
                self.check_image_reference(reference, &mut issues);
            }
        }
        if !issues.is_empty() {
            return Err(AppError::Validation(issues));
        }

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;
        if post.creator != user_id {
            return Err(AppError::Forbidden);
        }

        let image_url = request.image_url.as_deref().unwrap_or(&post.image_url);
        let replaced = image_url != post.image_url;

        let updated = self
            .posts
            .update(post_id, &request.title, &request.content, image_url)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        if replaced {
            self.assets.release(&post.image_url).await;
        }

        Ok(updated)
    }

    /// Delete an owned post: row first, then its asset, then the owner's
    /// mirror entry. Failures after the row deletion are logged, not retried,
    /// and not surfaced.
    pub async fn delete_post(&self, identity: &Identity, post_id: Uuid) -> Result<()> {
        let user_id = identity.require()?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;
        if post.creator != user_id {
            return Err(AppError::Forbidden);
        }

        if !self.posts.delete(post_id).await? {
            // Lost a race with a concurrent delete
            return Err(AppError::NotFound("Post".to_string()));
        }

        self.assets.release(&post.image_url).await;

        if let Err(err) = self.users.remove_post(user_id, post_id).await {
            tracing::error!(
                post_id = %post_id,
                user_id = %user_id,
                "fatal inconsistency: post deleted but owner's post list not updated: {}",
                err
            );
        }

        Ok(())
    }

    fn check_image_reference(&self, reference: &str, issues: &mut Vec<FieldError>) {
        if self.strict_image_urls && !reference.validate_url() {
            issues.push(FieldError {
                field: "imageUrl".to_string(),
                message: "must be a valid URL".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::DEFAULT_TOKEN_TTL_SECS;
    use crate::models::User;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Users {}

        #[async_trait::async_trait]
        impl UserRepository for Users {
            async fn insert(&self, new: NewUser) -> Result<User>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
            async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>>;
            async fn add_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()>;
            async fn remove_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()>;
        }
    }

    mock! {
        Posts {}

        #[async_trait::async_trait]
        impl PostRepository for Posts {
            async fn insert(&self, new: NewPost) -> Result<Post>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;
            async fn page(&self, limit: i64, offset: i64) -> Result<Vec<Post>>;
            async fn count(&self) -> Result<i64>;
            async fn update(
                &self,
                id: Uuid,
                title: &str,
                content: &str,
                image_url: &str,
            ) -> Result<Option<Post>>;
            async fn delete(&self, id: Uuid) -> Result<bool>;
        }
    }

    mock! {
        Assets {}

        #[async_trait::async_trait]
        impl AssetStore for Assets {
            async fn release(&self, reference: &str);
        }
    }

    fn post_fixture(id: Uuid, creator: Uuid, image_url: &str) -> Post {
        Post {
            id,
            title: "First Post".into(),
            content: "This is the first post!".into(),
            image_url: image_url.into(),
            creator,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user_fixture(id: Uuid) -> User {
        User {
            id,
            email: "a@x.com".into(),
            password_hash: "$argon2id$fixture".into(),
            name: "A".into(),
            status: "I am new!".into(),
            post_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(users: MockUsers, posts: MockPosts, assets: MockAssets) -> ContentService {
        ContentService::new(
            Arc::new(users),
            Arc::new(posts),
            Arc::new(assets),
            Arc::new(TokenService::new("test-secret", DEFAULT_TOKEN_TTL_SECS)),
            false,
        )
    }

    #[tokio::test]
    async fn create_post_returns_the_committed_post_when_the_mirror_write_fails() {
        let user_id = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut posts = MockPosts::new();
        posts
            .expect_insert()
            .times(1)
            .returning(move |new| Ok(post_fixture(post_id, new.creator, &new.image_url)));

        let mut users = MockUsers::new();
        users
            .expect_add_post()
            .with(eq(user_id), eq(post_id))
            .times(1)
            .returning(|_, _| Err(AppError::Database("connection reset".into())));

        let service = service(users, posts, MockAssets::new());
        let created = service
            .create_post(
                &Identity::authenticated(user_id, "a@x.com"),
                CreatePostRequest {
                    title: "First Post".into(),
                    content: "This is the first post!".into(),
                    image_url: "images/duck.jpg".into(),
                },
            )
            .await
            .expect("post committed, mirror failure must be swallowed");

        assert_eq!(created.id, post_id);
        assert_eq!(created.creator, user_id);
    }

    #[tokio::test]
    async fn delete_post_swallows_a_mirror_failure_after_the_row_is_gone() {
        let user_id = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut posts = MockPosts::new();
        posts
            .expect_find_by_id()
            .with(eq(post_id))
            .returning(move |id| Ok(Some(post_fixture(id, user_id, "images/duck.jpg"))));
        posts
            .expect_delete()
            .with(eq(post_id))
            .times(1)
            .returning(|_| Ok(true));

        let mut assets = MockAssets::new();
        assets
            .expect_release()
            .withf(|reference| reference == "images/duck.jpg")
            .times(1)
            .return_const(());

        let mut users = MockUsers::new();
        users
            .expect_remove_post()
            .times(1)
            .returning(|_, _| Err(AppError::Database("connection reset".into())));

        let service = service(users, posts, assets);
        service
            .delete_post(&Identity::authenticated(user_id, "a@x.com"), post_id)
            .await
            .expect("mirror failure after the delete must not surface");
    }

    #[tokio::test]
    async fn edit_post_with_unchanged_image_never_touches_the_asset_store() {
        let user_id = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut posts = MockPosts::new();
        posts
            .expect_find_by_id()
            .returning(move |id| Ok(Some(post_fixture(id, user_id, "images/duck.jpg"))));
        posts
            .expect_update()
            .withf(|_, _, _, image_url| image_url == "images/duck.jpg")
            .times(1)
            .returning(move |id, title, content, image_url| {
                let mut post = post_fixture(id, user_id, image_url);
                post.title = title.to_string();
                post.content = content.to_string();
                Ok(Some(post))
            });

        // No expectation on MockAssets: any release call panics the test.
        let service = service(MockUsers::new(), posts, MockAssets::new());
        service
            .edit_post(
                &Identity::authenticated(user_id, "a@x.com"),
                post_id,
                EditPostRequest {
                    title: "Edited title".into(),
                    content: "Edited content".into(),
                    image_url: Some("images/duck.jpg".into()),
                },
            )
            .await
            .expect("edit should succeed");
    }

    #[tokio::test]
    async fn edit_post_releases_exactly_the_old_asset_after_the_update() {
        let user_id = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut posts = MockPosts::new();
        posts
            .expect_find_by_id()
            .returning(move |id| Ok(Some(post_fixture(id, user_id, "images/old.jpg"))));
        posts
            .expect_update()
            .times(1)
            .returning(move |id, _, _, image_url| Ok(Some(post_fixture(id, user_id, image_url))));

        let mut assets = MockAssets::new();
        assets
            .expect_release()
            .withf(|reference| reference == "images/old.jpg")
            .times(1)
            .return_const(());

        let service = service(MockUsers::new(), posts, assets);
        let updated = service
            .edit_post(
                &Identity::authenticated(user_id, "a@x.com"),
                post_id,
                EditPostRequest {
                    title: "Edited title".into(),
                    content: "Edited content".into(),
                    image_url: Some("images/new.jpg".into()),
                },
            )
            .await
            .expect("edit should succeed");

        assert_eq!(updated.image_url, "images/new.jpg");
    }

    #[tokio::test]
    async fn strict_mode_rejects_opaque_image_references() {
        let service = ContentService::new(
            Arc::new(MockUsers::new()),
            Arc::new(MockPosts::new()),
            Arc::new(MockAssets::new()),
            Arc::new(TokenService::new("test-secret", DEFAULT_TOKEN_TTL_SECS)),
            true,
        );

        let err = service
            .create_post(
                &Identity::authenticated(Uuid::new_v4(), "a@x.com"),
                CreatePostRequest {
                    title: "First Post".into(),
                    content: "This is the first post!".into(),
                    image_url: "images/duck.jpg".into(),
                },
            )
            .await
            .expect_err("relative path must fail in strict mode");

        let AppError::Validation(issues) = err else {
            panic!("expected validation failure");
        };
        assert!(issues.iter().any(|i| i.field == "imageUrl"));
    }

    #[tokio::test]
    async fn unauthenticated_callers_fail_before_any_store_access() {
        // Mocks have no expectations, so any repository call panics.
        let service = service(MockUsers::new(), MockPosts::new(), MockAssets::new());
        let anonymous = Identity::anonymous();

        assert!(matches!(
            service.get_status(&anonymous).await,
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            service.list_posts(&anonymous, Some(1)).await,
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            service.delete_post(&anonymous, Uuid::new_v4()).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_generic() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let service = service(users, MockPosts::new(), MockAssets::new());
        let err = service
            .login(LoginRequest {
                email: "ghost@x.com".into(),
                password: "whatever".into(),
            })
            .await
            .expect_err("unknown email must fail");
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn signup_conflict_on_existing_email() {
        let user_id = Uuid::new_v4();
        let mut users = MockUsers::new();
        users
            .expect_find_by_email()
            .with(eq("a@x.com"))
            .returning(move |_| Ok(Some(user_fixture(user_id))));

        let service = service(users, MockPosts::new(), MockAssets::new());
        let err = service
            .signup(SignupRequest {
                email: "A@X.com".into(),
                password: "secret1".into(),
                name: "A".into(),
            })
            .await
            .expect_err("duplicate email must conflict");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_posts_clamps_non_positive_pages() {
        let mut posts = MockPosts::new();
        posts.expect_count().returning(|| Ok(3));
        posts
            .expect_page()
            .with(eq(POSTS_PER_PAGE), eq(0))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = service(MockUsers::new(), posts, MockAssets::new());
        let page = service
            .list_posts(&Identity::authenticated(Uuid::new_v4(), "a@x.com"), Some(0))
            .await
            .expect("page 0 behaves as page 1");
        assert_eq!(page.total_items, 3);
    }

    #[tokio::test]
    async fn list_posts_saturates_the_offset_for_huge_pages() {
        let mut posts = MockPosts::new();
        posts.expect_count().returning(|| Ok(3));
        posts
            .expect_page()
            .with(eq(POSTS_PER_PAGE), eq(i64::MAX))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = service(MockUsers::new(), posts, MockAssets::new());
        let page = service
            .list_posts(
                &Identity::authenticated(Uuid::new_v4(), "a@x.com"),
                Some(i64::MAX),
            )
            .await
            .expect("an absurd page is an empty page, not an overflow");
        assert!(page.posts.is_empty());
        assert_eq!(page.total_items, 3);
    }
}
