use crate::{
    analytics::TrackingTag,
    configuration::{ConfigurationError, EmailSettings},
    domain::MailIdentity,
    email_client::{EmailClient, EmailTransport},
    metrics::ContactMetrics,
    service::dispatch::DispatchPipeline,
};
use axum::extract::FromRef;
use derive_getters::Getters;
use duplicate::duplicate_item;
use std::sync::Arc;

#[derive(Debug, Clone, Getters)]
pub struct AppState {
    mail: Option<Arc<MailService>>,
    metrics: Arc<ContactMetrics>,
    tracking_tag: Option<Arc<TrackingTag>>,
}

impl AppState {
    pub fn new(
        mail: Option<MailService>,
        metrics: ContactMetrics,
        tracking_tag: Option<TrackingTag>,
    ) -> Self {
        Self {
            mail: mail.map(Arc::new),
            metrics: Arc::new(metrics),
            tracking_tag: tracking_tag.map(Arc::new),
        }
    }
}

#[duplicate_item(
    service_type                    field;
    [ Option<Arc<MailService>> ]    [ mail ];
    [ Arc<ContactMetrics> ]         [ metrics ];
    [ Option<Arc<TrackingTag>> ]    [ tracking_tag ];
)]
impl FromRef<AppState> for service_type {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.field.clone()
    }
}

/// Everything needed to relay a contact submission by email.
/// Only exists when the mail settings are complete.
#[derive(Debug, Getters)]
pub struct MailService {
    transport: Arc<dyn EmailTransport>,
    identity: MailIdentity,
    pipeline: DispatchPipeline,
}

impl MailService {
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        identity: MailIdentity,
        pipeline: DispatchPipeline,
    ) -> Self {
        Self {
            transport,
            identity,
            pipeline,
        }
    }

    /// Build the mail service from settings, sending through [`EmailClient`].
    pub fn from_settings(
        settings: &EmailSettings,
        site_name: &str,
    ) -> Result<Self, ConfigurationError> {
        let identity = settings.identity(site_name)?;
        let email_client = EmailClient::try_from(settings)?;

        Ok(Self::new(
            Arc::new(email_client),
            identity,
            DispatchPipeline::contact(),
        ))
    }
}
