use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    /// Canonical email pattern shared by registration, login and profile schemas.
    pub static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").unwrap();
}

/// Column list for queries returning a full [`User`] row.
pub const USER_COLUMNS: &str = "id, name, email, password_hash, avatar_url, theme, access_token, \
     refresh_token, verified, verification_token, created_at, updated_at";

/// UI theme preference stored on the account.
/// Corresponds to the `user_theme` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_theme", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Violet,
}

/// A full account row as stored in the database.
///
/// This struct is never serialized to a response directly; handlers go
/// through [`PublicUser`] so the password hash and token fields cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// `None` for accounts created through Google OAuth, which have no
    /// local password.
    pub password_hash: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: Theme,
    /// Last issued access token, kept for reference only.
    pub access_token: Option<String>,
    /// The single currently valid refresh token. A new login overwrites it,
    /// implicitly invalidating the previous session's refresh token.
    pub refresh_token: Option<String>,
    pub verified: bool,
    /// Opaque token mailed out for email verification.
    /// Invariant: `verified == true` implies this is `None`.
    pub verification_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The redacted account view returned by the API.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "avatarURL")]
    pub avatar_url: Option<String>,
    pub theme: Theme,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            theme: user.theme,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

/// Payload for `PATCH /auth/profile`. Only supplied fields are changed;
/// a supplied password is re-hashed before storage.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "avatarURL")]
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub theme: Option<Theme>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex() {
        assert!(EMAIL_REGEX.is_match("alice@example.com"));
        assert!(EMAIL_REGEX.is_match("a.lice-b@sub.example.org"));
        assert!(!EMAIL_REGEX.is_match("not-an-email"));
        assert!(!EMAIL_REGEX.is_match("@example.com"));
        assert!(!EMAIL_REGEX.is_match("alice@"));
    }

    #[test]
    fn test_public_user_redacts_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: Some("$2b$10$abcdef".into()),
            avatar_url: None,
            theme: Theme::Violet,
            access_token: Some("jwt".into()),
            refresh_token: Some("jwt".into()),
            verified: false,
            verification_token: Some("tok".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = PublicUser::from(user);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refreshToken").is_none());
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["theme"], "violet");
    }

    #[test]
    fn test_update_profile_validation() {
        let valid = UpdateProfileInput {
            name: Some("New Name".into()),
            avatar_url: Some("https://cdn.example.com/a.png".into()),
            password: Some("longenough".into()),
            theme: Some(Theme::Dark),
        };
        assert!(validator::Validate::validate(&valid).is_ok());

        let short_password = UpdateProfileInput {
            name: None,
            avatar_url: None,
            password: Some("short".into()),
            theme: None,
        };
        assert!(validator::Validate::validate(&short_password).is_err());

        let bad_url = UpdateProfileInput {
            name: None,
            avatar_url: Some("not a url".into()),
            password: None,
            theme: None,
        };
        assert!(validator::Validate::validate(&bad_url).is_err());
    }
}
