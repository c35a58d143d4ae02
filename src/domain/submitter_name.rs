use super::SubmissionError;
use unicode_segmentation::UnicodeSegmentation;

const MIN_NAME_LENGTH: usize = 2;

/// Struct to hold the validated name of whoever submitted the contact form.
/// The only way to create a `SubmitterName` is through `parse`, so consumers
/// of this type are always guaranteed a trimmed name of at least two
/// characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterName(String);

impl SubmitterName {
    pub fn parse(s: String) -> Result<Self, SubmissionError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SubmissionError::MissingFields);
        }

        // Using graphemes as some characters are perceived as a single character
        // but are composed of several code points.
        if trimmed.graphemes(true).count() < MIN_NAME_LENGTH {
            return Err(SubmissionError::NameTooShort);
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for SubmitterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
