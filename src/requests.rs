/// Typed request DTOs, one per use case
///
/// Every surface deserializes into these before the content service sees the
/// request. Validation aggregates all violations into one
/// `AppError::Validation` instead of failing on the first.
use crate::error::{AppError, FieldError, Result};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
}

impl SignupRequest {
    /// Trim the name and case-normalize the email before validation and any
    /// uniqueness check.
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.name = self.name.trim().to_string();
        self
    }
}

/// Login carries no field validation on purpose: any failure must come back
/// as the same generic `Unauthenticated`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 5, message = "must be at least 5 characters"))]
    pub title: String,
    #[validate(length(min = 5, message = "must be at least 5 characters"))]
    pub content: String,
    #[validate(length(min = 1, message = "image reference is required"))]
    pub image_url: String,
}

/// `image_url` is optional on edit; `None` keeps the stored reference.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditPostRequest {
    #[validate(length(min = 5, message = "must be at least 5 characters"))]
    pub title: String,
    #[validate(length(min = 5, message = "must be at least 5 characters"))]
    pub content: String,
    pub image_url: Option<String>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Run derive validation and fail with the aggregated violations
pub fn check(request: &impl Validate) -> Result<()> {
    let issues = collect(request);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(issues))
    }
}

/// Run derive validation and return the violations for the caller to extend
pub fn collect(request: &impl Validate) -> Vec<FieldError> {
    match request.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => {
            let mut issues = Vec::new();
            for (field, violations) in errors.field_errors() {
                for violation in violations {
                    issues.push(FieldError {
                        field: field.to_string(),
                        message: violation
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| violation.code.to_string()),
                    });
                }
            }
            // Deterministic order for clients and tests
            issues.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
            issues
        }
    }
}
