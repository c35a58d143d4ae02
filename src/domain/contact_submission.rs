use super::{ContactMessage, EmailAddress, SubmitterName};

/// Represents a validated contact form submission.
/// It only lives long enough to compose the outgoing emails.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: SubmitterName,
    pub email: EmailAddress,
    pub message: ContactMessage,
}

impl ContactSubmission {
    /// Validate the raw fields of a submission.
    ///
    /// Checks run in a fixed order and stop at the first failure: all fields
    /// present, email format, name length and finally message length.
    pub fn parse(name: String, email: String, message: String) -> Result<Self, SubmissionError> {
        if [&name, &email, &message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(SubmissionError::MissingFields);
        }

        let email = EmailAddress::parse(email)?;
        let name = SubmitterName::parse(name)?;
        let message = ContactMessage::parse(message)?;

        Ok(Self {
            name,
            email,
            message,
        })
    }
}

/// The ways a submission can be rejected. All of them are correctable by
/// whoever filled in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Message must be at least 10 characters")]
    MessageTooShort,
}
