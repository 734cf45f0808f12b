/// Auth handlers: signup, login and the user status line
use crate::auth::Identity;
use crate::error::Result;
use crate::requests::{LoginRequest, SignupRequest, UpdateStatusRequest};
use crate::services::ContentService;
use actix_web::{web, HttpResponse};

pub async fn signup(
    service: web::Data<ContentService>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    let user = service.signup(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User created.",
        "userId": user.id,
    })))
}

pub async fn login(
    service: web::Data<ContentService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let payload = service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payload))
}

pub async fn get_status(
    service: web::Data<ContentService>,
    identity: Identity,
) -> Result<HttpResponse> {
    let status = service.get_status(&identity).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": status })))
}

pub async fn update_status(
    service: web::Data<ContentService>,
    identity: Identity,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse> {
    let status = service
        .update_status(&identity, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Status updated.",
        "status": status,
    })))
}
