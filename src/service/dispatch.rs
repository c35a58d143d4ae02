use crate::{
    domain::{ContactSubmission, MailIdentity, OutboundEmail},
    email_client::{EmailTransport, SendEmailError},
};
use askama::Template;

/// Builds one outgoing email from a submission.
pub type ComposeStep = fn(&ContactSubmission, &MailIdentity) -> askama::Result<OutboundEmail>;

/// An ordered list of emails to send for a single submission.
///
/// Steps are composed and sent one after another. The next step only starts
/// once the previous send resolved, and the first failure aborts the rest.
#[derive(Clone, Default)]
pub struct DispatchPipeline {
    steps: Vec<(&'static str, ComposeStep)>,
}

impl DispatchPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pipeline run for every contact submission: a notification to the
    /// site owner followed by an acknowledgment to the submitter.
    pub fn contact() -> Self {
        Self::new()
            .then("admin_notification", compose_admin_notification)
            .then("acknowledgment", compose_acknowledgment)
    }

    /// Append a step to the end of the pipeline.
    pub fn then(mut self, name: &'static str, step: ComposeStep) -> Self {
        self.steps.push((name, step));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step against `transport`. Returns the number of emails sent.
    #[tracing::instrument(
        name = "Dispatch contact emails",
        skip_all,
        fields(steps = self.steps.len())
    )]
    pub async fn dispatch(
        &self,
        submission: &ContactSubmission,
        identity: &MailIdentity,
        transport: &dyn EmailTransport,
    ) -> Result<usize, DispatchError> {
        for &(name, step) in &self.steps {
            let email = step(submission, identity)
                .map_err(|source| DispatchError::Compose { step: name, source })?;

            transport
                .send(&email)
                .await
                .map_err(|source| DispatchError::Send { step: name, source })?;
            tracing::info!(step = name, "Email has been sent");
        }

        Ok(self.steps.len())
    }
}

impl std::fmt::Debug for DispatchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|(name, _)| name))
            .finish()
    }
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to compose the `{step}` email")]
    Compose {
        step: &'static str,
        #[source]
        source: askama::Error,
    },
    #[error("Failed to send the `{step}` email")]
    Send {
        step: &'static str,
        #[source]
        source: SendEmailError,
    },
}

impl DispatchError {
    /// Name of the step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            Self::Compose { step, .. } | Self::Send { step, .. } => *step,
        }
    }
}

#[derive(Template)]
#[template(path = "emails/contact_notification.html")]
struct ContactNotification<'a> {
    name: &'a str,
    email: &'a str,
    message_lines: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "emails/contact_acknowledgment.html")]
struct ContactAcknowledgment<'a> {
    name: &'a str,
    display_name: &'a str,
    message_lines: Vec<&'a str>,
}

/// Notify the site owner about a new submission.
pub fn compose_admin_notification(
    submission: &ContactSubmission,
    identity: &MailIdentity,
) -> askama::Result<OutboundEmail> {
    let html_body = ContactNotification {
        name: submission.name.as_ref(),
        email: submission.email.as_ref(),
        message_lines: submission.message.lines(),
    }
    .render()?;

    Ok(OutboundEmail {
        from: identity.from_header(),
        to: identity.admin().to_string(),
        subject: format!(
            "New Contact Form Submission from {} - {}",
            submission.name.as_ref(),
            identity.site_name()
        ),
        html_body,
    })
}

/// Let the submitter know their message arrived, with a copy of it.
pub fn compose_acknowledgment(
    submission: &ContactSubmission,
    identity: &MailIdentity,
) -> askama::Result<OutboundEmail> {
    let html_body = ContactAcknowledgment {
        name: submission.name.as_ref(),
        display_name: identity.display_name(),
        message_lines: submission.message.lines(),
    }
    .render()?;

    Ok(OutboundEmail {
        from: identity.from_header(),
        to: submission.email.to_string(),
        subject: format!("Thank you for reaching out - {}", identity.site_name()),
        html_body,
    })
}
