//! GraphQL surface
//!
//! Same use cases and error taxonomy as the REST surface; resolvers are thin
//! adapters over the shared `ContentService`. Errors carry
//! `{message, extensions: {code, data}}`.

pub mod auth;
pub mod content;

use crate::auth::Identity;
use crate::services::ContentService;
use async_graphql::{Context, EmptySubscription, MergedObject, Result as GraphQLResult, Schema};
use std::sync::Arc;

/// Root query object
#[derive(MergedObject, Default)]
pub struct QueryRoot(auth::AuthQuery, content::ContentQuery);

/// Root mutation object
#[derive(MergedObject, Default)]
pub struct MutationRoot(auth::AuthMutation, content::ContentMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(service: Arc<ContentService>) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(service)
    .finish()
}

pub(crate) fn service<'ctx>(ctx: &'ctx Context<'_>) -> GraphQLResult<&'ctx Arc<ContentService>> {
    ctx.data::<Arc<ContentService>>()
}

/// The caller identity injected per request by the HTTP layer; absent data
/// means the transport never resolved one, which is treated as anonymous.
pub(crate) fn identity<'ctx>(ctx: &'ctx Context<'_>) -> Identity {
    ctx.data::<Identity>().cloned().unwrap_or_default()
}
