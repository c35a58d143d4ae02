mod contact_message;
mod contact_submission;
mod email_address;
mod mail_identity;
mod outbound_email;
mod submitter_name;

pub use contact_message::ContactMessage;
pub use contact_submission::{ContactSubmission, SubmissionError};
pub use email_address::{is_valid_email, EmailAddress};
pub use mail_identity::MailIdentity;
pub use outbound_email::OutboundEmail;
pub use submitter_name::SubmitterName;
