/// User repository adapter
///
/// Thin typed CRUD over the `users` table plus maintenance of the `post_ids`
/// relationship mirror. No business rules live here; the one mapping this
/// adapter owns is turning the unique-email violation into `Conflict` so the
/// insert race does not surface as a 500.
use crate::error::{AppError, Result};
use crate::models::User;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Fields required to create a user; everything else is store-defaulted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, new: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>>;
    /// Append a post id to the owner's relationship mirror
    async fn add_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()>;
    /// Remove a post id from the owner's relationship mirror
    async fn remove_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, new: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return AppError::Conflict("Email address already registered.".to_string());
                }
            }
            err.into()
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn add_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET post_ids = array_append(post_ids, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(())
    }

    async fn remove_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET post_ids = array_remove(post_ids, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(())
    }
}
