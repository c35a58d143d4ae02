use super::ContactFormData;
use axum::async_trait;
use reqwest::{Client, Url};

/// Delivers a contact form to the server.
#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn submit(&self, data: &ContactFormData) -> Result<(), ContactApiError>;
}

/// Posts submissions as JSON to `<base_url>/contact`.
#[derive(Debug, Clone)]
pub struct ContactApiClient {
    base_url: Url,
    http_client: Client,
}

impl ContactApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http_client: Client::new(),
        }
    }
}

#[async_trait]
impl ContactApi for ContactApiClient {
    #[tracing::instrument(name = "Submit contact form", skip(self, data))]
    async fn submit(&self, data: &ContactFormData) -> Result<(), ContactApiError> {
        let url = self.base_url.join("contact")?;

        self.http_client
            .post(url)
            .json(data)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContactApiError {
    #[error("Contact endpoint url is invalid")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Contact submission failed")]
    Request(#[from] reqwest::Error),
}
