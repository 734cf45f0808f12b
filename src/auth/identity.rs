/// Caller identity resolution
///
/// The guard never rejects a request: a missing or invalid bearer token
/// resolves to an anonymous identity and each use case decides whether
/// anonymous access is allowed. Operations that need authentication call
/// `Identity::require` and fail `Unauthenticated` before touching any store.
use crate::auth::token::TokenService;
use crate::error::{AppError, Result};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

/// The resolved caller, anonymous or authenticated
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            email: Some(email.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// The caller's user id, or `Unauthenticated`
    pub fn require(&self) -> Result<Uuid> {
        self.user_id.ok_or(AppError::Unauthenticated)
    }
}

/// Resolve an `Authorization` header value into an identity
pub fn resolve_identity(tokens: &TokenService, auth_header: Option<&str>) -> Identity {
    let Some(token) = auth_header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return Identity::anonymous();
    };

    match tokens.verify(token) {
        Ok(claims) => match Uuid::parse_str(&claims.sub) {
            Ok(user_id) => Identity::authenticated(user_id, claims.email),
            Err(_) => Identity::anonymous(),
        },
        Err(_) => Identity::anonymous(),
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        let identity = match req.app_data::<web::Data<TokenService>>() {
            Some(tokens) => resolve_identity(tokens, auth_header),
            None => Identity::anonymous(),
        };

        ready(Ok(identity))
    }
}
