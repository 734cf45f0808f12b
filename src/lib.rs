/// Publish Service Library
///
/// Content-publishing backend: authenticated users create, read, update and
/// delete posts that belong to them. The same business logic is exposed
/// through a REST surface and a GraphQL surface, both thin adapters over the
/// `ContentService` orchestrator.
///
/// # Modules
///
/// - `handlers`: REST request handlers
/// - `graphql`: GraphQL schema and resolvers
/// - `services`: business logic layer and asset lifecycle
/// - `db`: repository adapters over Postgres
/// - `auth`: password hashing, token issuance, identity resolution
/// - `models`: persisted entities and wire views
/// - `requests`: typed per-use-case request DTOs with validation
/// - `error`: error taxonomy shared by both surfaces
/// - `config`: configuration management
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod models;
pub mod requests;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
