//! Transactional email dispatch through the SendGrid v3 HTTP API.
//!
//! Dispatch is awaited inline by the triggering request; a provider rejection
//! surfaces as `AppError::EmailDelivery` on that request. When no API key is
//! configured (local development, tests) the mailer logs the message it would
//! have sent and reports success.

use serde_json::json;

use crate::config::Config;
use crate::error::AppError;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_key: Option<String>,
    from: Option<String>,
    support: Option<String>,
    public_url: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.sendgrid_api_key.clone(),
            from: config.email_from.clone(),
            support: config.support_email.clone(),
            public_url: config.public_url.clone(),
        }
    }

    /// Sends the account-verification email with a link embedding the token.
    pub async fn send_verification(&self, to: &str, token: &str) -> Result<(), AppError> {
        let link = format!("{}/auth/verify/{}", self.public_url, token);
        let subject = "Verify your email";
        let text = format!("Click the link to verify your email: {}", link);
        let html = format!(
            "<p>Welcome to <strong>TaskBoard</strong>!</p>\
             <p>Click the link below to verify your account:</p>\
             <a href=\"{link}\">Verify Email</a>\
             <p>Or copy and paste this URL into your browser:</p>\
             <p>{link}</p>"
        );
        self.dispatch(to, subject, &text, Some(&html)).await
    }

    /// Relays a support request to the configured support address.
    pub async fn send_support_request(&self, reply_to: &str, comment: &str) -> Result<(), AppError> {
        let to = self
            .support
            .clone()
            .or_else(|| self.from.clone())
            .ok_or_else(|| AppError::EmailDelivery("Support address not configured".into()))?;
        let subject = "Need help request";
        let text = format!("From: {}\n\n{}", reply_to, comment);
        self.dispatch(&to, subject, &text, None).await
    }

    async fn dispatch(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
    ) -> Result<(), AppError> {
        let (api_key, from) = match (&self.api_key, &self.from) {
            (Some(key), Some(from)) => (key, from),
            _ => {
                log::warn!("email dispatch disabled; would send '{}' to {}", subject, to);
                return Ok(());
            }
        };

        let mut content = vec![json!({ "type": "text/plain", "value": text })];
        if let Some(html) = html {
            content.push(json!({ "type": "text/html", "value": html }));
        }
        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": from },
            "subject": subject,
            "content": content,
        });

        let response = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::EmailDelivery(format!("Error sending email: {}", e)))?;

        if response.status().is_success() {
            log::info!("email '{}' sent to {}", subject, to);
            Ok(())
        } else {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            log::error!("SendGrid rejected message ({}): {}", status, detail);
            Err(AppError::EmailDelivery("Error sending email".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn disabled_mailer() -> Mailer {
        let config = Config {
            database_url: "postgres://unused".into(),
            server_host: "127.0.0.1".into(),
            server_port: 8080,
            token_secret: "secret".into(),
            refresh_token_secret: "refresh".into(),
            google: None,
            frontend_url: "http://localhost:3000".into(),
            sendgrid_api_key: None,
            email_from: None,
            support_email: None,
            public_url: "http://127.0.0.1:8080".into(),
            avatar_dir: "public/avatars".into(),
        };
        Mailer::new(&config)
    }

    #[actix_rt::test]
    async fn test_disabled_mailer_reports_success() {
        let mailer = disabled_mailer();
        assert!(mailer
            .send_verification("alice@example.com", "tok123")
            .await
            .is_ok());
    }

    #[actix_rt::test]
    async fn test_support_request_without_address_fails() {
        let mut mailer = disabled_mailer();
        // An API key without any sender/support address is a configuration
        // error the caller should see.
        mailer.api_key = Some("SG.key".into());
        match mailer.send_support_request("bob@example.com", "help").await {
            Err(AppError::EmailDelivery(_)) => {}
            other => panic!("Expected EmailDelivery error, got {:?}", other),
        }
    }
}
