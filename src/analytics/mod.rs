//! Consent-gated analytics.
//!
//! A [`ConsentContext`] owns the persisted consent decision and broadcasts
//! every transition. A [`TrackerLoader`] subscribes to it and injects the
//! tracking tag the first time consent is accepted. After that it forwards
//! page views and interaction events for as long as consent stays accepted.

mod consent;
mod storage;
mod tracker;

pub use consent::{ConsentContext, ConsentState, ConsentSubscription};
pub use storage::{ConsentStorage, MemoryStorage, CONSENT_KEY};
pub use tracker::{DataLayer, Tracker, TrackerCommand, TrackerLoader, TrackingTag};

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Failed to persist consent: {0}")]
    Storage(String),
    #[error("`{0}` is not a valid tracking id")]
    InvalidTrackingId(String),
    #[error("Failed to render the tracking snippet")]
    Render(#[source] askama::Error),
}
