use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;

use crate::auth::extractors::CurrentUser;
use crate::auth::token::TokenIssuer;
use crate::error::AppError;
use crate::models::user::{User, USER_COLUMNS};

/// The access-control gate.
///
/// For every non-public path it extracts the bearer token from the
/// `Authorization` header, verifies signature and expiry against the
/// access-token secret, resolves the signed subject to an account, and
/// attaches a [`CurrentUser`] to request extensions. Any failure short-circuits
/// into a 401 envelope response before the protected handler runs; the gate
/// itself never writes to the store.
pub struct AuthMiddleware;

/// Paths reachable without a bearer token.
///
/// `/auth/avatar` (upload) is gated while `/auth/avatars/{file}` (download)
/// is public, hence the trailing slash in the prefix.
fn is_public(path: &str) -> bool {
    path == "/"
        || path == "/health"
        || path == "/auth/register"
        || path == "/auth/login"
        || path == "/auth/refresh-token"
        || path == "/auth/need-help"
        || path.starts_with("/auth/verify")
        || path.starts_with("/auth/google")
        || path.starts_with("/auth/avatars/")
        || path.starts_with("/assets/")
}

/// Resolves the bearer token on a gated request to an account.
async fn authenticate(req: &ServiceRequest) -> Result<User, AppError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("Token issuer not configured".into()))?;
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("Database pool not configured".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))?;

    let claims = issuer.verify_access_token(token)?;

    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = $1",
        USER_COLUMNS
    ))
    .bind(claims.sub)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Not authorized".into()))
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public(req.path()) {
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }

            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(CurrentUser::from(user));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                // Refusals become envelope responses here rather than
                // surfacing as service errors.
                Err(err) => {
                    let response = err.error_response().map_into_right_body();
                    let (req, _) = req.into_parts();
                    Ok(ServiceResponse::new(req, response))
                }
            }
        })
    }
}
