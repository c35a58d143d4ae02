use super::AnalyticsError;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Key the consent decision is stored under.
pub const CONSENT_KEY: &str = "cookieConsent";

/// Key/value storage that outlives a single page, like the browser's local
/// storage.
pub trait ConsentStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AnalyticsError>;
}

/// In-memory storage. Clones share the same entries, which makes two clones
/// behave like two tabs of the same site.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl ConsentStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AnalyticsError> {
        self.entries
            .lock()
            .map_err(|e| AnalyticsError::Storage(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
