use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{Theme, User};

/// The authenticated account attached to a request by `AuthMiddleware`.
///
/// This is a redacted view: it never carries the password hash or stored
/// tokens. Handlers on gated routes take it as an extractor parameter.
///
/// If it is missing from request extensions (the gate did not run), the
/// extractor fails closed with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub theme: Theme,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            theme: user.theme,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized("Not authorized".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;

    fn sample_user() -> CurrentUser {
        CurrentUser::from(User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: Some("hash".into()),
            avatar_url: None,
            theme: Theme::Violet,
            access_token: None,
            refresh_token: None,
            verified: true,
            verification_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[actix_rt::test]
    async fn test_current_user_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        let user = sample_user();
        let expected_id = user.id;
        req.extensions_mut().insert(user);

        let mut payload = Payload::None;
        let extracted = CurrentUser::from_request(&req, &mut payload).await;
        assert!(extracted.is_ok());
        assert_eq!(extracted.unwrap().id, expected_id);
    }

    #[actix_rt::test]
    async fn test_current_user_extractor_fails_closed() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = CurrentUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
