//! Mail transports: a JSON mail-provider API client and a console fallback.
//!
//! The transport seam is a trait so the dispatcher never cares which one is
//! wired in. Development runs log messages instead of sending them; the
//! provider client posts to an HTTP API with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::domain::ports::NotificationError;

/// A fully assembled message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
}

/// Delivery seam between the dispatcher and the outside world.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one message.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError>;
}

/// Log-only transport used in development and when no provider is configured.
pub struct ConsoleMailTransport;

#[async_trait]
impl MailTransport for ConsoleMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError> {
        info!(
            to = %email.to.join(", "),
            subject = %email.subject,
            body = %email.text_body,
            "console mail transport"
        );
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text_body: &'a str,
}

/// HTTP client for a JSON mail-provider API.
pub struct ApiMailTransport {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiMailTransport {
    /// Create a client for the provider at `base_url`, authenticated with a
    /// bearer `token`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Transport`] when the underlying HTTP
    /// client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| NotificationError::transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl MailTransport for ApiMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError> {
        let url = format!("{}/email", self.base_url.trim_end_matches('/'));
        let request = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            text_body: &email.text_body,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|err| NotificationError::transport(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotificationError::Rejected {
                status: response.status().as_u16(),
            })
        }
    }
}
