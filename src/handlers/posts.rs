/// Post handlers: CRUD and pagination over posts
use crate::auth::Identity;
use crate::error::Result;
use crate::requests::{CreatePostRequest, EditPostRequest};
use crate::services::ContentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
}

pub async fn list_posts(
    service: web::Data<ContentService>,
    identity: Identity,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let page = service.list_posts(&identity, query.page).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_post(
    service: web::Data<ContentService>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.get_post(&identity, *post_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "post": post })))
}

pub async fn create_post(
    service: web::Data<ContentService>,
    identity: Identity,
    request: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = service.create_post(&identity, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Post created successfully.",
        "post": post,
    })))
}

pub async fn edit_post(
    service: web::Data<ContentService>,
    identity: Identity,
    post_id: web::Path<Uuid>,
    request: web::Json<EditPostRequest>,
) -> Result<HttpResponse> {
    let post = service
        .edit_post(&identity, *post_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post updated.",
        "post": post,
    })))
}

pub async fn delete_post(
    service: web::Data<ContentService>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_post(&identity, *post_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Post deleted." })))
}
