use crate::{
    auth::{
        google::GoogleOAuth, hash_password, verify_password, AuthResponse, CurrentUser,
        EmailRequest, LoginRequest, NeedHelpRequest, RefreshTokenRequest, RegisterRequest,
        TokenIssuer,
    },
    config::Config,
    email::Mailer,
    error::AppError,
    models::{
        user::{User, USER_COLUMNS},
        PublicUser,
    },
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

async fn store_session_tokens(
    pool: &PgPool,
    user_id: Uuid,
    access_token: &str,
    refresh_token: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE users SET access_token = $1, refresh_token = $2, updated_at = now() WHERE id = $3",
    )
    .bind(access_token)
    .bind(refresh_token)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Register a new account.
///
/// Hashes the password, stores the account unverified with a fresh
/// verification token, and dispatches the verification email. The email
/// uniqueness pre-check only provides the fast-path 409; the unique index on
/// `users.email` is the actual guarantee under concurrent signups.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    mailer: web::Data<Mailer>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    if find_user_by_email(&pool, &register_data.email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let verification_token = Uuid::new_v4().simple().to_string();

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, password_hash, verification_token) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&register_data.name)
    .bind(&register_data.email)
    .bind(&password_hash)
    .bind(&verification_token)
    .fetch_one(&**pool)
    .await?;

    mailer
        .send_verification(&user.email, &verification_token)
        .await?;

    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}

/// Authenticate with email and password.
///
/// Issues a fresh access/refresh token pair and stores both on the account,
/// overwriting any previous refresh token (single active session).
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = find_user_by_email(&pool, &login_data.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Email or password is incorrect".into()))?;

    // OAuth-created accounts have no local password to check.
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Email or password is incorrect".into()))?;

    if !verify_password(&login_data.password, password_hash)? {
        return Err(AppError::Unauthorized("Email or password is incorrect".into()));
    }

    if !user.verified {
        return Err(AppError::Unauthorized("Email is not verified".into()));
    }

    let access_token = issuer.generate_access_token(user.id)?;
    let refresh_token = issuer.generate_refresh_token(user.id)?;
    store_session_tokens(&pool, user.id, &access_token, &refresh_token).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
    }))
}

/// Mint a new access token from a refresh token.
///
/// The refresh token must verify against the refresh secret *and* equal the
/// value currently stored on the account; the refresh token itself is not
/// rotated.
#[post("/refresh-token")]
pub async fn refresh_access_token(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    refresh_data: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AppError> {
    refresh_data.validate().map_err(|_| {
        AppError::BadRequest("refreshToken is required".into())
    })?;

    let claims = issuer
        .verify_refresh_token(&refresh_data.refresh_token)
        .map_err(|_| AppError::Unauthorized("Refresh token expired or invalid".into()))?;

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = $1",
        USER_COLUMNS
    ))
    .bind(claims.sub)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Refresh token expired or invalid".into()))?;

    if user.refresh_token.as_deref() != Some(refresh_data.refresh_token.as_str()) {
        return Err(AppError::Unauthorized("Refresh token expired or invalid".into()));
    }

    let access_token = issuer.generate_access_token(user.id)?;
    sqlx::query("UPDATE users SET access_token = $1, updated_at = now() WHERE id = $2")
        .bind(&access_token)
        .bind(user.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "accessToken": access_token })))
}

/// Confirm an email address from the mailed verification link.
#[get("/verify/{token}")]
pub async fn verify_email(
    pool: web::Data<PgPool>,
    token: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let updated = sqlx::query(
        "UPDATE users SET verified = TRUE, verification_token = NULL, updated_at = now() \
         WHERE verification_token = $1 AND verified = FALSE",
    )
    .bind(token.into_inner())
    .execute(&**pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("Verification token not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Verification successful" })))
}

/// Resend the verification email, reusing the stored token when present.
#[post("/verify")]
pub async fn resend_verification(
    pool: web::Data<PgPool>,
    mailer: web::Data<Mailer>,
    email_data: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    email_data.validate()?;

    let user = find_user_by_email(&pool, &email_data.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not found".into()))?;

    if user.verified {
        return Err(AppError::BadRequest("Email already verified".into()));
    }

    let token = match user.verification_token {
        Some(token) => token,
        None => {
            let token = Uuid::new_v4().simple().to_string();
            sqlx::query(
                "UPDATE users SET verification_token = $1, updated_at = now() WHERE id = $2",
            )
            .bind(&token)
            .bind(user.id)
            .execute(&**pool)
            .await?;
            token
        }
    };

    mailer.send_verification(&user.email, &token).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Verification email sent" })))
}

/// Clear both stored tokens for the authenticated account.
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let updated = sqlx::query(
        "UPDATE users SET access_token = NULL, refresh_token = NULL, updated_at = now() \
         WHERE id = $1",
    )
    .bind(user.id)
    .execute(&**pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("Account not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out" })))
}

/// Redirect the browser to Google's consent page.
#[get("/google")]
pub async fn google_auth(
    oauth: web::Data<Option<GoogleOAuth>>,
) -> Result<impl Responder, AppError> {
    let oauth = oauth
        .get_ref()
        .as_ref()
        .ok_or_else(|| AppError::Internal("Google OAuth is not configured".into()))?;

    Ok(HttpResponse::Found()
        .append_header(("Location", oauth.authorize_url()))
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
}

/// Handle Google's callback: exchange the code, link or create the account,
/// issue tokens, and bounce back to the frontend with the access token in the
/// query string.
#[get("/google/callback")]
pub async fn google_callback(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    config: web::Data<Config>,
    oauth: web::Data<Option<GoogleOAuth>>,
    query: web::Query<GoogleCallbackQuery>,
) -> Result<impl Responder, AppError> {
    let oauth = oauth
        .get_ref()
        .as_ref()
        .ok_or_else(|| AppError::Internal("Google OAuth is not configured".into()))?;
    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".into()))?;

    let profile = oauth.fetch_profile(code).await?;

    let user = match find_user_by_email(&pool, &profile.email).await? {
        Some(user) => user,
        None => {
            // Delegated authentication: no local password, email trusted as
            // verified because Google attests it.
            let name = profile
                .name
                .unwrap_or_else(|| profile.email.split('@').next().unwrap_or_default().to_string());
            sqlx::query_as::<_, User>(&format!(
                "INSERT INTO users (name, email, avatar_url, verified) \
                 VALUES ($1, $2, $3, TRUE) RETURNING {}",
                USER_COLUMNS
            ))
            .bind(&name)
            .bind(&profile.email)
            .bind(&profile.picture)
            .fetch_one(&**pool)
            .await?
        }
    };

    let access_token = issuer.generate_access_token(user.id)?;
    let refresh_token = issuer.generate_refresh_token(user.id)?;
    store_session_tokens(&pool, user.id, &access_token, &refresh_token).await?;

    let location = format!("{}?accessToken={}", config.frontend_url, access_token);
    Ok(HttpResponse::Found()
        .append_header(("Location", location))
        .finish())
}

/// Relay a support message through the email dispatcher.
#[post("/need-help")]
pub async fn need_help(
    mailer: web::Data<Mailer>,
    help_data: web::Json<NeedHelpRequest>,
) -> Result<impl Responder, AppError> {
    help_data.validate()?;

    mailer
        .send_support_request(&help_data.email, &help_data.comment)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Message sent" })))
}

#[cfg(test)]
mod tests {
    use crate::auth::{LoginRequest, RegisterRequest};
    use validator::Validate;

    #[test]
    fn test_register_payload_validation() {
        let invalid_email = RegisterRequest {
            name: "Alice".into(),
            email: "invalid-email".into(),
            password: "Passw0rd!".into(),
        };
        assert!(invalid_email.validate().is_err());

        let short_password = RegisterRequest {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "short".into(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_login_payload_validation() {
        let valid = LoginRequest {
            email: "alice@example.com".into(),
            password: "Passw0rd!".into(),
        };
        assert!(valid.validate().is_ok());
    }
}
