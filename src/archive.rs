//! Append-only archive of submitted survey responses.
//!
//! The archive owns the persisted ordered list of [`SurveyResponse`]
//! records, independent of the active session. Every mutation writes
//! the full list back to the store, then fires a change notification,
//! in that order: an observer always sees a fully committed archive.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::store::KeyValueStore;
use crate::types::{ResponseId, SurveyResponse, SurveySession};

/// Storage key for the response archive.
pub const RESPONSES_KEY: &str = "chwSurveyResponses";

/// Change notification emitted after every mutating archive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveEvent {
    /// A response was appended.
    Appended(ResponseId),
    /// A response was removed.
    Removed(ResponseId),
    /// The whole archive was cleared.
    Cleared,
}

/// Handle identifying a single subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&ArchiveEvent) + Send>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

/// Subscription handle for archive change notifications.
///
/// Cloned out of [`ResponseArchive::watcher`]; lets independently owned
/// views (a dashboard, an exporter) subscribe without holding the
/// archive itself.
#[derive(Clone, Default)]
pub struct ArchiveWatcher {
    inner: Arc<Mutex<Subscribers>>,
}

impl ArchiveWatcher {
    /// Register a callback invoked after every committed mutation.
    pub fn subscribe(&self, callback: impl Fn(&ArchiveEvent) + Send + 'static) -> SubscriptionId {
        let mut subscribers = self.inner.lock();
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.entries.push((id, Box::new(callback)));
        id
    }

    /// Drop a subscription. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.lock();
        let before = subscribers.entries.len();
        subscribers.entries.retain(|(sub_id, _)| *sub_id != id);
        subscribers.entries.len() != before
    }

    fn notify(&self, event: &ArchiveEvent) {
        for (_, callback) in self.inner.lock().entries.iter() {
            callback(event);
        }
    }
}

impl std::fmt::Debug for ArchiveWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWatcher")
            .field("subscribers", &self.inner.lock().entries.len())
            .finish()
    }
}

/// Error appending to the archive.
///
/// The only archive operation that surfaces failure: the caller keeps
/// the in-progress session and may retry the submission.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError<E: std::error::Error> {
    /// The archive could not be written to storage.
    #[error("failed to persist response archive: {0}")]
    Storage(#[source] E),
    /// The archive could not be serialized.
    #[error("failed to serialize response archive: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only store of submitted survey responses.
#[derive(Debug)]
pub struct ResponseArchive<S: KeyValueStore> {
    store: S,
    watcher: ArchiveWatcher,
}

impl<S: KeyValueStore> ResponseArchive<S> {
    /// Create an archive over the given backend.
    pub fn new(store: S) -> Self {
        Self {
            store,
            watcher: ArchiveWatcher::default(),
        }
    }

    /// Handle for subscribing to change notifications.
    pub fn watcher(&self) -> ArchiveWatcher {
        self.watcher.clone()
    }

    /// Archive a submitted session.
    ///
    /// Snapshots the session by value under a freshly generated id and
    /// the current timestamp, appends it to the persisted list, then
    /// notifies observers. On error nothing is persisted and no
    /// notification fires.
    pub fn append(&mut self, session: &SurveySession) -> Result<SurveyResponse, ArchiveError<S::Error>> {
        let response = SurveyResponse::from_session(session);

        let mut responses = self.list();
        responses.push(response.clone());

        let payload = serde_json::to_string(&responses)?;
        self.store
            .put(RESPONSES_KEY, &payload)
            .map_err(ArchiveError::Storage)?;

        debug!(id = %response.id, total = responses.len(), "response archived");
        self.watcher.notify(&ArchiveEvent::Appended(response.id.clone()));
        Ok(response)
    }

    /// All archived responses in insertion order.
    ///
    /// Unreadable or unparseable storage is logged and degrades to an
    /// empty list; listing never fails.
    pub fn list(&self) -> Vec<SurveyResponse> {
        let payload = match self.store.get(RESPONSES_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read response archive");
                return Vec::new();
            }
        };

        match serde_json::from_str(&payload) {
            Ok(responses) => responses,
            Err(e) => {
                warn!(error = %e, "failed to parse response archive");
                Vec::new()
            }
        }
    }

    /// Delete the response with the given id.
    ///
    /// Returns whether anything was removed; notifies only on success.
    pub fn remove(&mut self, id: &str) -> bool {
        let responses = self.list();
        let original_len = responses.len();
        let remaining: Vec<_> = responses
            .into_iter()
            .filter(|response| response.id.as_str() != id)
            .collect();

        if remaining.len() == original_len {
            return false;
        }

        let payload = match serde_json::to_string(&remaining) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize response archive");
                return false;
            }
        };

        if let Err(e) = self.store.put(RESPONSES_KEY, &payload) {
            warn!(error = %e, "failed to persist response archive");
            return false;
        }

        self.watcher
            .notify(&ArchiveEvent::Removed(ResponseId::from(id.to_string())));
        true
    }

    /// Empty the entire archive. Notifies unconditionally.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(RESPONSES_KEY) {
            warn!(error = %e, "failed to clear response archive");
        }
        self.watcher.notify(&ArchiveEvent::Cleared);
    }

    /// Consume the archive, returning the backend.
    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn archive() -> ResponseArchive<InMemoryStore> {
        ResponseArchive::new(InMemoryStore::new())
    }

    #[test]
    fn test_append_then_list_round_trip() {
        let mut archive = archive();
        let session = SurveySession::new();

        let before = archive.list().len();
        let response = archive.append(&session).unwrap();
        let after = archive.list();

        assert_eq!(after.len(), before + 1);
        assert_eq!(after.last().unwrap().data, session);
        assert_eq!(after.last().unwrap().id, response.id);
    }

    #[test]
    fn test_appended_ids_are_unique() {
        let mut archive = archive();
        let session = SurveySession::new();

        let a = archive.append(&session).unwrap();
        let b = archive.append(&session).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_remove_reports_whether_anything_was_deleted() {
        let mut archive = archive();
        let response = archive.append(&SurveySession::new()).unwrap();

        assert!(archive.remove(response.id.as_str()));
        assert!(!archive.remove(response.id.as_str()));
        assert!(archive.list().is_empty());
    }

    #[test]
    fn test_clear_empties_archive() {
        let mut archive = archive();
        archive.append(&SurveySession::new()).unwrap();
        archive.append(&SurveySession::new()).unwrap();

        archive.clear();
        assert!(archive.list().is_empty());
    }

    #[test]
    fn test_unreadable_payload_degrades_to_empty() {
        let mut backend = InMemoryStore::new();
        backend.put(RESPONSES_KEY, "}{garbage").unwrap();

        let archive = ResponseArchive::new(backend);
        assert!(archive.list().is_empty());
    }

    #[test]
    fn test_notifications_fire_after_commit() {
        let mut archive = archive();
        let watcher = archive.watcher();

        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        watcher.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let response = archive.append(&SurveySession::new()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        archive.remove(response.id.as_str());
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // Clear notifies unconditionally, even when already empty.
        archive.clear();
        archive.clear();
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut archive = archive();
        let watcher = archive.watcher();

        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let id = watcher.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(watcher.unsubscribe(id));
        assert!(!watcher.unsubscribe(id));

        archive.append(&SurveySession::new()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_observer_sees_committed_state() {
        let mut archive = archive();
        let watcher = archive.watcher();

        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        watcher.subscribe(move |event| {
            sink.lock().push(event.clone());
        });

        let response = archive.append(&SurveySession::new()).unwrap();

        let events = observed.lock();
        assert_eq!(events.as_slice(), [ArchiveEvent::Appended(response.id.clone())]);
    }
}
