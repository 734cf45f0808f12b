/// Database access layer: connection setup and repository adapters
pub mod post_repo;
pub mod user_repo;

pub use post_repo::{NewPost, PgPostRepository, PostRepository};
pub use user_repo::{NewUser, PgUserRepository, UserRepository};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create the Postgres connection pool
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}
