//! Client for the HTTP mail service that relays outgoing emails.

use crate::{
    configuration::{ConfigurationError, EmailSettings},
    domain::OutboundEmail,
};
use axum::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

/// Anything able to deliver an [`OutboundEmail`].
/// A rejected send is reported straight away, there are no retries.
#[async_trait]
pub trait EmailTransport: std::fmt::Debug + Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendEmailError>;
}

#[derive(Debug)]
pub struct EmailClient {
    base_url: Url,
    http_client: Client,
    username: String,
    password: Secret<String>,
}

impl EmailClient {
    /// Create a new email client.
    pub fn new(base_url: Url, username: String, password: Secret<String>) -> Self {
        Self {
            base_url,
            http_client: Client::new(),
            username,
            password,
        }
    }
}

#[async_trait]
impl EmailTransport for EmailClient {
    #[tracing::instrument(name = "Send email", skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendEmailError> {
        let url = self.base_url.join("email")?;

        self.http_client
            .post(url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(email)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl TryFrom<&EmailSettings> for EmailClient {
    type Error = ConfigurationError;

    fn try_from(config: &EmailSettings) -> Result<Self, Self::Error> {
        let (username, password) = config.credentials()?;
        Ok(Self::new(config.base_url()?, username, password))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendEmailError {
    #[error("Mail service url is invalid")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Mail service rejected the email")]
    Rejected(#[from] reqwest::Error),
}
