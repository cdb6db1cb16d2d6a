//! The in-progress survey session.

use serde::{Deserialize, Serialize};

use crate::sequencer::Step;

use super::MediaContact;

/// Number of media contacts collected per session by default.
pub const DEFAULT_CONTACT_COUNT: usize = 4;

/// A single in-progress survey session.
///
/// Holds a fixed-size ordered sequence of contacts plus the wizard
/// position (current step and current contact index).
///
/// Invariants, maintained by [`crate::SurveyStore`] and checked on
/// restore from storage:
///
/// - `current_contact_index` is always in `0..media_contacts.len()`
/// - `current_step` is always a defined [`Step`]
///
/// JSON keys are camelCase and the step is stored as its integer index,
/// matching the layout the original survey persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySession {
    media_contacts: Vec<MediaContact>,
    current_step: Step,
    current_contact_index: usize,
}

impl SurveySession {
    /// Fresh session with [`DEFAULT_CONTACT_COUNT`] blank contacts,
    /// positioned at the splash step.
    pub fn new() -> Self {
        Self::with_contact_count(DEFAULT_CONTACT_COUNT)
    }

    /// Fresh session with `count` blank contacts.
    ///
    /// `count` must be at least 1; a zero-contact session would have no
    /// valid contact index.
    pub fn with_contact_count(count: usize) -> Self {
        assert!(count >= 1, "a session needs at least one contact");
        Self {
            media_contacts: vec![MediaContact::default(); count],
            current_step: Step::Splash,
            current_contact_index: 0,
        }
    }

    /// All contacts, in order.
    pub fn media_contacts(&self) -> &[MediaContact] {
        &self.media_contacts
    }

    /// Number of contacts in this session.
    pub fn contact_count(&self) -> usize {
        self.media_contacts.len()
    }

    /// Current wizard step.
    pub fn current_step(&self) -> Step {
        self.current_step
    }

    /// Index of the contact currently being surveyed.
    pub fn current_contact_index(&self) -> usize {
        self.current_contact_index
    }

    /// The contact currently being surveyed.
    pub fn current_contact(&self) -> &MediaContact {
        &self.media_contacts[self.current_contact_index]
    }

    /// Whether the current contact is the last one.
    pub fn is_last_contact(&self) -> bool {
        self.current_contact_index == self.media_contacts.len() - 1
    }

    /// Whether a restored session satisfies the positional invariants.
    ///
    /// Deserialization cannot enforce them, so the store re-checks
    /// before accepting a persisted payload.
    pub fn is_well_formed(&self) -> bool {
        !self.media_contacts.is_empty() && self.current_contact_index < self.media_contacts.len()
    }

    pub(crate) fn current_contact_mut(&mut self) -> &mut MediaContact {
        &mut self.media_contacts[self.current_contact_index]
    }

    pub(crate) fn set_step(&mut self, step: Step) {
        self.current_step = step;
    }

    pub(crate) fn set_contact_index(&mut self, index: usize) {
        debug_assert!(index < self.media_contacts.len());
        self.current_contact_index = index;
    }
}

impl Default for SurveySession {
    fn default() -> Self {
        Self::new()
    }
}
