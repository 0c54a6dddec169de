pub mod extractors;
pub mod google;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::EMAIL_REGEX;
use crate::models::PublicUser;

// Re-export necessary items
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

/// Payload for a new account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Must match the canonical email pattern.
    #[validate(regex(path = "EMAIL_REGEX", message = "invalid email format"))]
    pub email: String,
    /// Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
}

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(regex(path = "EMAIL_REGEX", message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Payload for `POST /auth/refresh-token`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refreshToken is required"))]
    pub refresh_token: String,
}

/// Payload carrying only an email address (verification resend).
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(regex(path = "EMAIL_REGEX", message = "invalid email format"))]
    pub email: String,
}

/// Payload for `POST /auth/need-help`.
#[derive(Debug, Deserialize, Validate)]
pub struct NeedHelpRequest {
    #[validate(regex(path = "EMAIL_REGEX", message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

/// Response body for a successful login or OAuth sign-in.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}
