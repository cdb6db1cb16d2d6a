//! The survey state store.
//!
//! Owns the single active [`SurveySession`], applies sequencer
//! transitions, and persists the full session to its backing store on
//! every mutation. The store is an explicitly owned value the caller
//! injects a backend into; there is no process-wide global.

use tracing::{debug, warn};

use crate::sequencer::{self, Step};
use crate::store::KeyValueStore;
use crate::types::{ContactInfoPatch, MediaContact, PlatformQuestionsPatch, SurveySession};

/// Storage key for the active session.
pub const SESSION_KEY: &str = "chwSurveyData";

/// Holds the in-progress survey session and persists it across reloads.
///
/// Every mutation writes the full session back to the store before
/// returning. Persistence failures are logged and swallowed: losing a
/// checkpoint must never break the wizard mid-survey.
#[derive(Debug)]
pub struct SurveyStore<S: KeyValueStore> {
    store: S,
    session: SurveySession,
}

impl<S: KeyValueStore> SurveyStore<S> {
    /// Open the store, restoring a previously persisted session.
    ///
    /// An absent, unparseable, or invariant-violating payload is logged
    /// and replaced with a fresh session. Never fails.
    pub fn open(store: S) -> Self {
        let session = restore_session(&store).unwrap_or_default();
        Self { store, session }
    }

    /// Like [`SurveyStore::open`], but a fresh session gets `count`
    /// contacts instead of the default. A restored session keeps the
    /// count it was persisted with.
    pub fn open_with_contact_count(store: S, count: usize) -> Self {
        let session =
            restore_session(&store).unwrap_or_else(|| SurveySession::with_contact_count(count));
        Self { store, session }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> &SurveySession {
        &self.session
    }

    /// The contact currently being surveyed.
    pub fn current_contact(&self) -> &MediaContact {
        self.session.current_contact()
    }

    /// Whether the current contact is the last one.
    pub fn is_last_contact(&self) -> bool {
        self.session.is_last_contact()
    }

    /// Whether the current step's required answers allow advancing.
    pub fn can_advance(&self) -> bool {
        sequencer::can_advance(&self.session)
    }

    /// Merge patch fields into the current contact's contact info.
    ///
    /// Touches only `media_contacts[current_contact_index]`. No format
    /// validation happens here; the caller validates before committing.
    pub fn update_contact_info(&mut self, patch: ContactInfoPatch) {
        patch.apply(&mut self.session.current_contact_mut().contact_info);
        self.persist();
    }

    /// Merge patch fields into the current contact's platform answers.
    pub fn update_platform_questions(&mut self, patch: PlatformQuestionsPatch) {
        patch.apply(&mut self.session.current_contact_mut().platform_questions);
        self.persist();
    }

    /// Advance to the next step, applying skip rules.
    ///
    /// Returns `false` (and leaves the session untouched) when the
    /// current step's required answer is missing or the wizard is at
    /// its terminal step.
    pub fn next_step(&mut self) -> bool {
        match sequencer::advance(&self.session) {
            Some(transition) => {
                self.apply(transition);
                true
            }
            None => false,
        }
    }

    /// Go back one step. No-op at the splash screen. Skip rules are not
    /// re-applied on the way back.
    pub fn prev_step(&mut self) {
        let transition = sequencer::retreat(&self.session);
        self.apply(transition);
    }

    /// Jump to an arbitrary step without conditions.
    pub fn go_to_step(&mut self, step: Step) {
        debug!(from = %self.session.current_step(), to = %step, "jump");
        self.session.set_step(step);
        self.persist();
    }

    /// Move to the next contact's contact-info step, or to the summary
    /// when the current contact is the last one.
    pub fn move_to_next_contact(&mut self) {
        let transition = sequencer::move_to_next_contact(&self.session);
        self.apply(transition);
    }

    /// Jump to the contact-info step for the contact at `index`, for
    /// editing from the summary view.
    ///
    /// Returns `false` for an out-of-range index.
    pub fn edit_contact(&mut self, index: usize) -> bool {
        if index >= self.session.contact_count() {
            return false;
        }
        self.session.set_contact_index(index);
        self.session.set_step(Step::ContactInfo);
        self.persist();
        true
    }

    /// Replace the session with a fresh one and erase the persisted copy.
    pub fn reset(&mut self) {
        self.session = SurveySession::new();
        if let Err(e) = self.store.remove(SESSION_KEY) {
            warn!(error = %e, "failed to erase persisted session");
        }
    }

    /// Consume the store, returning the backend.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn apply(&mut self, transition: sequencer::Transition) {
        debug!(
            from = %self.session.current_step(),
            to = %transition.step,
            contact = transition.contact_index,
            "step transition"
        );
        if transition.clear_reason {
            self.session
                .current_contact_mut()
                .platform_questions
                .why_not_efficient
                .clear();
        }
        self.session.set_contact_index(transition.contact_index);
        self.session.set_step(transition.step);
        self.persist();
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.session) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize session");
                return;
            }
        };
        if let Err(e) = self.store.put(SESSION_KEY, &payload) {
            warn!(error = %e, "failed to persist session");
        }
    }
}

fn restore_session<S: KeyValueStore>(store: &S) -> Option<SurveySession> {
    let payload = match store.get(SESSION_KEY) {
        Ok(Some(payload)) => payload,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "failed to read persisted session, starting fresh");
            return None;
        }
    };

    match serde_json::from_str::<SurveySession>(&payload) {
        Ok(session) if session.is_well_formed() => Some(session),
        Ok(_) => {
            warn!("persisted session violates invariants, starting fresh");
            None
        }
        Err(e) => {
            warn!(error = %e, "failed to parse persisted session, starting fresh");
            None
        }
    }
}
