use std::env;

/// Google OAuth client settings. The OAuth routes answer 500 when these are
/// not configured; everything else works without them.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Application configuration, read from the environment exactly once at
/// process start and passed by reference (`web::Data`) into the token issuer,
/// the mailer and the handlers. Business logic never reads ambient env vars.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Secret for signing short-lived access tokens.
    pub token_secret: String,
    /// Secret for signing refresh tokens.
    pub refresh_token_secret: String,
    pub google: Option<GoogleConfig>,
    /// Where the OAuth callback finally redirects the browser.
    pub frontend_url: String,
    pub sendgrid_api_key: Option<String>,
    pub email_from: Option<String>,
    pub support_email: Option<String>,
    /// Base URL embedded in verification links.
    pub public_url: String,
    /// Directory where uploaded avatars are stored.
    pub avatar_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .expect("SERVER_PORT must be a number");

        let google = match (
            env::var("GOOGLE_CLIENT_ID"),
            env::var("GOOGLE_CLIENT_SECRET"),
            env::var("GOOGLE_CALLBACK_URL"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(callback_url)) => Some(GoogleConfig {
                client_id,
                client_secret,
                callback_url,
            }),
            _ => None,
        };

        let email_from = env::var("EMAIL_FROM").ok();
        let support_email = env::var("SUPPORT_EMAIL").ok().or_else(|| email_from.clone());
        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host,
            server_port,
            token_secret: env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set"),
            refresh_token_secret: env::var("REFRESH_TOKEN_SECRET")
                .unwrap_or_else(|_| "REFRESH_SECRET".to_string()),
            google,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            sendgrid_api_key: env::var("SENDGRID_API_KEY").ok(),
            email_from,
            support_email,
            public_url,
            avatar_dir: env::var("AVATAR_DIR").unwrap_or_else(|_| "public/avatars".to_string()),
        }
    }

    pub fn server_addr(&self) -> (String, u16) {
        (self.server_host.clone(), self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("TOKEN_SECRET", "access-secret");
        env::remove_var("REFRESH_TOKEN_SECRET");
        env::remove_var("SERVER_PORT");
        env::remove_var("PUBLIC_URL");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.token_secret, "access-secret");
        // Fallback literal kept from the original deployment.
        assert_eq!(config.refresh_token_secret, "REFRESH_SECRET");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.public_url, "http://127.0.0.1:8080");

        env::set_var("SERVER_PORT", "3000");
        env::set_var("REFRESH_TOKEN_SECRET", "refresh-secret");
        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.refresh_token_secret, "refresh-secret");
    }

    #[test]
    fn test_google_config_requires_all_three_vars() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("TOKEN_SECRET", "access-secret");
        env::set_var("GOOGLE_CLIENT_ID", "id");
        env::remove_var("GOOGLE_CLIENT_SECRET");
        env::remove_var("GOOGLE_CALLBACK_URL");

        let config = Config::from_env();
        assert!(config.google.is_none());
    }
}
