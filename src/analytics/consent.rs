use super::{AnalyticsError, ConsentStorage, CONSENT_KEY};
use tokio::sync::watch;

/// The visitor's decision about tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsentState {
    /// No decision yet. The consent prompt is shown.
    #[default]
    Unset,
    Accepted,
    Declined,
}

impl ConsentState {
    /// Interpret a stored value. Anything unknown counts as no decision.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("accepted") => Self::Accepted,
            Some("declined") => Self::Declined,
            _ => Self::Unset,
        }
    }

    pub fn as_stored(&self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Accepted => Some("accepted"),
            Self::Declined => Some("declined"),
        }
    }
}

/// What every subscription receives. `acceptances` counts how often consent
/// became accepted, so a quick accept then decline is still observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ConsentSignal {
    state: ConsentState,
    acceptances: u64,
}

/// Owns the consent decision for a session.
///
/// The state is read from storage on [`ConsentContext::init`] and only ever
/// changes through an explicit [`accept`](ConsentContext::accept) or
/// [`decline`](ConsentContext::decline), or when another session writes the
/// stored value and [`sync_from_storage`](ConsentContext::sync_from_storage)
/// picks it up. Every change is broadcast to all live subscriptions.
pub struct ConsentContext<S> {
    storage: S,
    sender: watch::Sender<ConsentSignal>,
}

impl<S: ConsentStorage> ConsentContext<S> {
    pub fn init(storage: S) -> Self {
        let state = ConsentState::from_stored(storage.get(CONSENT_KEY).as_deref());
        let (sender, _) = watch::channel(ConsentSignal {
            state,
            acceptances: 0,
        });
        tracing::debug!(?state, "Consent context initialised");

        Self { storage, sender }
    }

    pub fn state(&self) -> ConsentState {
        self.sender.borrow().state
    }

    /// Whether the consent prompt should be shown.
    pub fn should_prompt(&self) -> bool {
        self.state() == ConsentState::Unset
    }

    pub fn accept(&self) -> Result<(), AnalyticsError> {
        self.transition(ConsentState::Accepted)
    }

    pub fn decline(&self) -> Result<(), AnalyticsError> {
        self.transition(ConsentState::Declined)
    }

    /// Persist `next` and notify every subscriber, even if the state did not
    /// change.
    fn transition(&self, next: ConsentState) -> Result<(), AnalyticsError> {
        if let Some(stored) = next.as_stored() {
            self.storage.set(CONSENT_KEY, stored)?;
        }

        let mut previous = ConsentState::Unset;
        self.sender.send_modify(|signal| {
            previous = signal.state;
            signal.record(next);
        });
        tracing::info!(?previous, ?next, "Consent updated");
        Ok(())
    }

    /// Re-read the stored decision, e.g. after another tab changed it.
    /// Subscribers are only notified when the state actually changed.
    pub fn sync_from_storage(&self) -> bool {
        let stored = ConsentState::from_stored(self.storage.get(CONSENT_KEY).as_deref());
        self.sender.send_if_modified(|signal| {
            if signal.state == stored {
                return false;
            }
            signal.record(stored);
            true
        })
    }

    /// Register a new observer. It stays registered until the returned
    /// subscription is dropped.
    pub fn subscribe(&self) -> ConsentSubscription {
        let receiver = self.sender.subscribe();
        let seen_acceptances = receiver.borrow().acceptances;

        ConsentSubscription {
            receiver,
            seen_acceptances,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ConsentSignal {
    fn record(&mut self, next: ConsentState) {
        if next == ConsentState::Accepted {
            self.acceptances += 1;
        }
        self.state = next;
    }
}

impl<S> std::fmt::Debug for ConsentContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentContext")
            .field("state", &self.sender.borrow().state)
            .field("subscribers", &self.sender.receiver_count())
            .finish_non_exhaustive()
    }
}

/// A registered observer of a [`ConsentContext`].
#[derive(Debug)]
pub struct ConsentSubscription {
    receiver: watch::Receiver<ConsentSignal>,
    seen_acceptances: u64,
}

impl ConsentSubscription {
    /// Whether a notification arrived since the state was last read.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Read the latest state and mark it as seen.
    pub fn current(&mut self) -> ConsentState {
        self.receiver.borrow_and_update().state
    }

    /// Whether consent was accepted since the last call, or since the
    /// subscription was created. True even if it was declined again after.
    pub fn accepted_since_last_check(&mut self) -> bool {
        let acceptances = self.receiver.borrow().acceptances;
        let accepted = acceptances > self.seen_acceptances;
        self.seen_acceptances = acceptances;
        accepted
    }

    /// Wait for the next notification. Returns `None` once the context is gone.
    pub async fn changed(&mut self) -> Option<ConsentState> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }
}
