use super::SubmissionError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Email pattern to be a valid regex");
}

/// Check that `s` has the shape `local@domain.tld`: no whitespace, a single
/// `@` and at least one `.` inside the domain part.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s)
}

/// Represents a valid email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse an email address.
    /// The format check runs against the raw input, so surrounding whitespace
    /// is rejected rather than silently trimmed away.
    pub fn parse(s: String) -> Result<Self, SubmissionError> {
        if s.trim().is_empty() {
            return Err(SubmissionError::MissingFields);
        }
        if !is_valid_email(&s) {
            return Err(SubmissionError::InvalidEmailFormat);
        }

        Ok(Self(s))
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
