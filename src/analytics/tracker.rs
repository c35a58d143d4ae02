use super::{AnalyticsError, ConsentContext, ConsentState, ConsentStorage, ConsentSubscription};
use askama::Template;
use serde_json::{json, Value};

/// Identifier of the third-party tracking tag, e.g. `G-XXXXXXXXXX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingTag(String);

impl TrackingTag {
    pub fn parse(id: &str) -> Result<Self, AnalyticsError> {
        let id = id.trim();
        let is_valid =
            !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

        if is_valid {
            Ok(Self(id.to_string()))
        } else {
            Err(AnalyticsError::InvalidTrackingId(id.to_string()))
        }
    }

    /// The HTML that loads the tag and configures it.
    pub fn snippet(&self) -> Result<String, AnalyticsError> {
        GtagSnippet { id: &self.0 }
            .render()
            .map_err(AnalyticsError::Render)
    }
}

impl AsRef<str> for TrackingTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Template)]
#[template(path = "analytics/gtag.html")]
struct GtagSnippet<'a> {
    id: &'a str,
}

/// A command forwarded to the tracking tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerCommand {
    /// A page view for `page_path`.
    Config { tag: String, page_path: String },
    Event {
        action: String,
        category: String,
        label: Option<String>,
        value: Option<i64>,
    },
}

impl TrackerCommand {
    /// The arguments of the equivalent `gtag(...)` call.
    pub fn to_gtag_args(&self) -> Value {
        match self {
            Self::Config { tag, page_path } => json!(["config", tag, { "page_path": page_path }]),
            Self::Event {
                action,
                category,
                label,
                value,
            } => json!([
                "event",
                action,
                {
                    "event_category": category,
                    "event_label": label,
                    "value": value,
                }
            ]),
        }
    }
}

/// The injected third-party tag.
pub trait Tracker {
    fn inject(&mut self, tag: &TrackingTag) -> Result<(), AnalyticsError>;
    fn send(&mut self, command: TrackerCommand);
}

/// Tracker that keeps the rendered snippet and every forwarded command, the
/// same way the tag's own `dataLayer` queue does.
#[derive(Debug, Default)]
pub struct DataLayer {
    snippets: Vec<String>,
    entries: Vec<Value>,
}

impl DataLayer {
    pub fn snippets(&self) -> &[String] {
        &self.snippets
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }
}

impl Tracker for DataLayer {
    fn inject(&mut self, tag: &TrackingTag) -> Result<(), AnalyticsError> {
        self.snippets.push(tag.snippet()?);
        Ok(())
    }

    fn send(&mut self, command: TrackerCommand) {
        self.entries.push(command.to_gtag_args());
    }
}

/// Loads the tracking tag once consent is accepted and forwards events to it.
///
/// The loader is inert while consent is unset or declined. The tag is injected
/// at most once. An injected tag is never removed, a later decline only stops
/// events from being forwarded.
#[derive(Debug)]
pub struct TrackerLoader<T> {
    tag: TrackingTag,
    subscription: ConsentSubscription,
    tracker: T,
    injected: bool,
}

impl<T: Tracker> TrackerLoader<T> {
    /// Subscribe to `context` and inject right away if consent was already
    /// given.
    pub fn mount<S: ConsentStorage>(
        tag: TrackingTag,
        context: &ConsentContext<S>,
        tracker: T,
    ) -> Result<Self, AnalyticsError> {
        let mut loader = Self {
            tag,
            subscription: context.subscribe(),
            tracker,
            injected: false,
        };
        loader.refresh()?;

        Ok(loader)
    }

    /// Process pending consent notifications. Returns whether the tag is
    /// injected.
    ///
    /// An acceptance counts even if consent was declined again before this
    /// call.
    pub fn refresh(&mut self) -> Result<bool, AnalyticsError> {
        if self.injected {
            return Ok(true);
        }

        let accepted = self.subscription.accepted_since_last_check();
        if accepted || self.subscription.current() == ConsentState::Accepted {
            self.tracker.inject(&self.tag)?;
            self.injected = true;
            tracing::info!(tag = self.tag.as_ref(), "Tracking tag injected");
        }

        Ok(self.injected)
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Release the subscription and hand back the tracker.
    pub fn unmount(self) -> T {
        self.tracker
    }

    /// Consent is read again on every call.
    fn may_forward(&mut self) -> bool {
        if let Err(e) = self.refresh() {
            tracing::warn!(error.message = %e, "Failed to inject the tracking tag");
        }
        self.injected && self.subscription.current() == ConsentState::Accepted
    }

    pub fn track_page_view(&mut self, page_path: &str) -> bool {
        if !self.may_forward() {
            return false;
        }
        self.tracker.send(TrackerCommand::Config {
            tag: self.tag.as_ref().to_string(),
            page_path: page_path.to_string(),
        });
        true
    }

    pub fn track_event(
        &mut self,
        action: &str,
        category: &str,
        label: Option<&str>,
        value: Option<i64>,
    ) -> bool {
        if !self.may_forward() {
            return false;
        }
        self.tracker.send(TrackerCommand::Event {
            action: action.to_string(),
            category: category.to_string(),
            label: label.map(str::to_string),
            value,
        });
        true
    }

    pub fn track_button_click(&mut self, button_name: &str) -> bool {
        self.track_event("click", "button", Some(button_name), None)
    }

    pub fn track_form_submission(&mut self, form_name: &str) -> bool {
        self.track_event("submit", "form", Some(form_name), None)
    }

    pub fn track_download(&mut self, file_name: &str) -> bool {
        self.track_event("download", "file", Some(file_name), None)
    }
}
