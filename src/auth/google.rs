//! Google OAuth 2.0 authorization-code flow.
//!
//! Authentication is delegated to Google: the browser is redirected to the
//! consent page, Google calls back with a code, and the code is exchanged for
//! an access token that lets us read the user's email claim. Accounts created
//! this way have no local password and are considered verified.

use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::error::AppError;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// The subset of Google's userinfo response the account component needs.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the Google side of the OAuth flow.
#[derive(Clone)]
pub struct GoogleOAuth {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleOAuth {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// URL of Google's consent page for this client.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=email%20profile",
            AUTHORIZE_URL,
            urlencode(&self.config.client_id),
            urlencode(&self.config.callback_url),
        )
    }

    /// Exchanges an authorization code for the user's profile.
    pub async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, AppError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http.post(TOKEN_URL).form(&params).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Unauthorized(
                "Google code exchange failed".into(),
            ));
        }
        let token: TokenResponse = response.json().await?;

        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Unauthorized(
                "Google userinfo request failed".into(),
            ));
        }
        let profile: GoogleProfile = response.json().await?;
        Ok(profile)
    }
}

/// Minimal percent-encoding for query-string values.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
