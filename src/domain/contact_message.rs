use super::SubmissionError;
use unicode_segmentation::UnicodeSegmentation;

const MIN_MESSAGE_LENGTH: usize = 10;

/// The trimmed body of a contact submission, at least ten characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub fn parse(s: String) -> Result<Self, SubmissionError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SubmissionError::MissingFields);
        }
        if trimmed.graphemes(true).count() < MIN_MESSAGE_LENGTH {
            return Err(SubmissionError::MessageTooShort);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The message split on newlines, so each line can be rendered with a
    /// line break in between.
    pub fn lines(&self) -> Vec<&str> {
        self.0.split('\n').map(|line| line.trim_end_matches('\r')).collect()
    }
}

impl AsRef<str> for ContactMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
