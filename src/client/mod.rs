//! The browser side of the contact flow: form state with early validation, and
//! the client used to post submissions to the server.

mod api;
mod form;

pub use api::{ContactApi, ContactApiClient, ContactApiError};
pub use form::{ContactForm, ContactFormData, Field, FormErrors, SubmitStatus};
