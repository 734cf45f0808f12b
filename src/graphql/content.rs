//! Post resolvers: getPosts, getSinglePost, createPost, editPost, deletePost

use crate::error::AppError;
use crate::graphql::{identity, service};
use crate::models::{Post, PostPage};
use crate::requests::{CreatePostRequest, EditPostRequest};
use async_graphql::{
    Context, ErrorExtensions, InputObject, Object, Result as GraphQLResult, SimpleObject,
};
use uuid::Uuid;

#[derive(SimpleObject, Clone, Debug)]
pub struct PostData {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostData {
    fn from(post: Post) -> Self {
        PostData {
            id: post.id.to_string(),
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            creator: post.creator.to_string(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct PostPageData {
    pub posts: Vec<PostData>,
    pub total_items: i64,
}

impl From<PostPage> for PostPageData {
    fn from(page: PostPage) -> Self {
        PostPageData {
            posts: page.posts.into_iter().map(Into::into).collect(),
            total_items: page.total_items,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

#[derive(InputObject, Debug)]
pub struct UpdatePostInput {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// `NotFound` for ids that are not even UUID-shaped, matching the REST
/// surface's path matching.
fn parse_post_id(post_id: &str) -> GraphQLResult<Uuid> {
    Uuid::parse_str(post_id).map_err(|_| AppError::NotFound("Post".to_string()).extend())
}

#[derive(Default)]
pub struct ContentQuery;

#[Object]
impl ContentQuery {
    async fn get_posts(&self, ctx: &Context<'_>, page: Option<i32>) -> GraphQLResult<PostPageData> {
        let page = service(ctx)?
            .list_posts(&identity(ctx), page.map(i64::from))
            .await
            .map_err(|e| e.extend())?;

        Ok(page.into())
    }

    async fn get_single_post(&self, ctx: &Context<'_>, post_id: String) -> GraphQLResult<PostData> {
        let post = service(ctx)?
            .get_post(&identity(ctx), parse_post_id(&post_id)?)
            .await
            .map_err(|e| e.extend())?;

        Ok(post.into())
    }
}

#[derive(Default)]
pub struct ContentMutation;

#[Object]
impl ContentMutation {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        post_input: PostInput,
    ) -> GraphQLResult<PostData> {
        let post = service(ctx)?
            .create_post(
                &identity(ctx),
                CreatePostRequest {
                    title: post_input.title,
                    content: post_input.content,
                    image_url: post_input.image_url,
                },
            )
            .await
            .map_err(|e| e.extend())?;

        Ok(post.into())
    }

    async fn edit_post(
        &self,
        ctx: &Context<'_>,
        post_id: String,
        post_input: UpdatePostInput,
    ) -> GraphQLResult<PostData> {
        let post = service(ctx)?
            .edit_post(
                &identity(ctx),
                parse_post_id(&post_id)?,
                EditPostRequest {
                    title: post_input.title,
                    content: post_input.content,
                    image_url: post_input.image_url,
                },
            )
            .await
            .map_err(|e| e.extend())?;

        Ok(post.into())
    }

    async fn delete_post(&self, ctx: &Context<'_>, post_id: String) -> GraphQLResult<bool> {
        service(ctx)?
            .delete_post(&identity(ctx), parse_post_id(&post_id)?)
            .await
            .map_err(|e| e.extend())?;

        Ok(true)
    }
}
