use crate::{
    domain::{ContactSubmission, SubmissionError},
    metrics::{ContactMetrics, SubmissionOutcome},
    service::dispatch::DispatchError,
    state::{AppState, MailService},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use http::StatusCode;
use std::sync::Arc;
use tracing::field::display;
use utoipa::ToSchema;

/// Body of a contact submission.
/// Absent fields are treated like empty ones.
#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<ContactRequest> for ContactSubmission {
    type Error = SubmissionError;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        Self::parse(
            value.name.unwrap_or_default(),
            value.email.unwrap_or_default(),
            value.message.unwrap_or_default(),
        )
    }
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ContactResponse {
    message: String,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    error: String,
}

/// Create a router to serve endpoints.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/", post(submit_contact))
}

/// Relay a contact form submission to the site owner, and send an
/// acknowledgment to the submitter.
#[tracing::instrument(
    name = "Relay a contact submission",
    skip(mail, metrics, payload),
    fields(
        submitter_email = tracing::field::Empty,
        submitter_name = tracing::field::Empty,
    )
)]
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = OK, description = "Both emails were sent", body = ContactResponse),
        (status = BAD_REQUEST, description = "The submission is invalid", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Mail is not configured or could not be sent", body = ErrorResponse),
    )
)]
pub async fn submit_contact(
    State(mail): State<Option<Arc<MailService>>>,
    State(metrics): State<Arc<ContactMetrics>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ContactError> {
    let outcome = relay_submission(mail.as_deref(), payload).await;

    metrics.record(match &outcome {
        Ok(_) => SubmissionOutcome::Sent,
        Err(e) if e.class() == ErrorClass::BadRequest => SubmissionOutcome::Rejected,
        Err(_) => SubmissionOutcome::Failed,
    });

    outcome
}

async fn relay_submission(
    mail: Option<&MailService>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ContactError> {
    let Json(request) = payload.map_err(ContactError::InvalidRequestBody)?;
    let mail = mail.ok_or(ContactError::Configuration)?;
    let submission: ContactSubmission = request.try_into()?;

    tracing::Span::current()
        .record("submitter_email", &display(&submission.email))
        .record("submitter_name", &display(submission.name.as_ref()));

    mail.pipeline()
        .dispatch(&submission, mail.identity(), mail.transport().as_ref())
        .await
        .map_err(ContactError::SendFailure)?;

    Ok(Json(ContactResponse {
        message: "Email sent successfully".to_string(),
    }))
}

/// Whether an error is the caller's to fix, or ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    ServerError,
}

impl ErrorClass {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Everything that can go wrong while relaying a contact submission.
/// The messages of server-side errors never mention configuration details.
#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Invalid JSON")]
    InvalidRequestBody(#[source] JsonRejection),
    #[error("Email configuration error")]
    Configuration,
    #[error(transparent)]
    Validation(#[from] SubmissionError),
    #[error("Failed to send email")]
    SendFailure(#[source] DispatchError),
}

impl ContactError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRequestBody(_) | Self::Validation(_) => ErrorClass::BadRequest,
            Self::Configuration | Self::SendFailure(_) => ErrorClass::ServerError,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let class = self.class();
        match class {
            ErrorClass::BadRequest => {
                tracing::info!(error.message = %self, "Contact submission rejected")
            }
            ErrorClass::ServerError => tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Failed to relay contact submission"
            ),
        }

        (
            class.status_code(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
