use super::ContactApi;
use crate::domain::is_valid_email;
use unicode_segmentation::UnicodeSegmentation;

/// The values of the contact form, as sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// Validation message per field, `None` when the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    name: Option<&'static str>,
    email: Option<&'static str>,
    message: Option<&'static str>,
}

impl FormErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        *self.slot(field)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }

    fn slot(&self, field: Field) -> &Option<&'static str> {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<&'static str> {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }
}

/// Outcome of the last submission attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

/// State behind the contact form.
///
/// Validation here only gives early feedback. The server checks everything
/// again before sending anything.
#[derive(Debug, Default)]
pub struct ContactForm {
    data: ContactFormData,
    errors: FormErrors,
    is_submitting: bool,
    status: SubmitStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.data.name,
            Field::Email => &self.data.email,
            Field::Message => &self.data.message,
        }
    }

    /// Update a field. Any error shown for it is cleared straight away.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.data.name,
            Field::Email => &mut self.data.email,
            Field::Message => &mut self.data.message,
        };
        *slot = value.into();
        *self.errors.slot_mut(field) = None;
    }

    pub fn data(&self) -> &ContactFormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Check every field and record the errors. Returns whether the form is
    /// valid.
    pub fn validate(&mut self) -> bool {
        self.errors = FormErrors {
            name: validate_name(&self.data.name),
            email: validate_email(&self.data.email),
            message: validate_message(&self.data.message),
        };
        self.errors.is_empty()
    }

    /// Validate and, if everything is fine, send the form through `api`.
    ///
    /// A successful submission clears the form. A failed one keeps the values
    /// so the visitor can try again.
    #[tracing::instrument(name = "Submit contact form", skip_all)]
    pub async fn submit<A>(&mut self, api: &A) -> SubmitStatus
    where
        A: ContactApi + ?Sized,
    {
        if !self.validate() {
            tracing::debug!(errors = ?self.errors, "Contact form is invalid");
            return self.status;
        }

        self.is_submitting = true;
        self.status = SubmitStatus::Idle;

        let outcome = api.submit(&self.data).await;
        self.status = match outcome {
            Ok(()) => {
                self.data = ContactFormData::default();
                self.errors = FormErrors::default();
                SubmitStatus::Success
            }
            Err(e) => {
                tracing::warn!(error.message = %e, error.cause_chain = ?e, "Contact form submission failed");
                SubmitStatus::Error
            }
        };
        self.is_submitting = false;

        self.status
    }

    /// Banner text shown after a submission attempt.
    pub fn banner(&self) -> Option<&'static str> {
        match self.status {
            SubmitStatus::Idle => None,
            SubmitStatus::Success => {
                Some("Thank you for your message! I'll get back to you as soon as I can.")
            }
            SubmitStatus::Error => {
                Some("Sorry, there was an error sending your message. Please try again.")
            }
        }
    }
}

fn validate_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        Some("Name is required")
    } else if name.graphemes(true).count() < 2 {
        Some("Name must be at least 2 characters")
    } else {
        None
    }
}

fn validate_email(email: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        Some("Email is required")
    } else if !is_valid_email(email) {
        Some("Please enter a valid email address")
    } else {
        None
    }
}

fn validate_message(message: &str) -> Option<&'static str> {
    let message = message.trim();
    if message.is_empty() {
        Some("Message is required")
    } else if message.graphemes(true).count() < 10 {
        Some("Message must be at least 10 characters")
    } else {
        None
    }
}
