use crate::config::Config;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access tokens live for one hour.
const ACCESS_TOKEN_TTL: chrono::Duration = chrono::Duration::hours(1);
/// Refresh tokens live for seven days.
const REFRESH_TOKEN_TTL: chrono::Duration = chrono::Duration::days(7);

/// Claims encoded within both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the account's unique identifier.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Stateless issuer and verifier for access and refresh tokens.
///
/// Holds both signing secrets, taken from [`Config`] once at startup; nothing
/// in this module reads the process environment.
#[derive(Clone)]
pub struct TokenIssuer {
    access_secret: String,
    refresh_secret: String,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            access_secret: config.token_secret.clone(),
            refresh_secret: config.refresh_token_secret.clone(),
        }
    }

    pub fn from_secrets(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
        }
    }

    /// Signs a short-lived access token for the given account.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String, AppError> {
        sign(user_id, ACCESS_TOKEN_TTL, &self.access_secret)
    }

    /// Signs a longer-lived refresh token for the given account.
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String, AppError> {
        sign(user_id, REFRESH_TOKEN_TTL, &self.refresh_secret)
    }

    /// Verifies an access token's signature and expiry and returns its claims.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        verify(token, &self.access_secret)
    }

    /// Verifies a refresh token's signature and expiry and returns its claims.
    ///
    /// The caller must additionally check the token against the value stored
    /// on the account record; a signature alone does not make a refresh token
    /// current.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        verify(token, &self.refresh_secret)
    }
}

fn sign(user_id: Uuid, ttl: chrono::Duration, secret: &str) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal("Token expiry out of range".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

fn verify(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
