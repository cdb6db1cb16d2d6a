//! # chw-survey-core
//!
//! Survey state machine, local persistence, and export/analytics for
//! the CHW media contact survey wizard.
//!
//! The core answers three questions:
//!
//! > Given the current step, contact, and answers, what is the next
//! > valid step? Where does the in-progress session live across
//! > reloads? What do the submitted responses add up to?
//!
//! ## Architecture
//!
//! ```text
//! UI intent → SurveyStore → Sequencer (skip rules) → persisted session
//!                  ↓ submit
//!           ResponseArchive → ArchiveWatcher (change signal)
//!                  ↓
//!           Export/Analytics (CSV, JSON, aggregates)
//! ```
//!
//! The presentation layer is an external collaborator: it reads
//! session snapshots, validates form input (helpers in [`validate`]),
//! and invokes the transition operations. Nothing here renders.
//!
//! ## Guarantees
//!
//! - The contact index never leaves `0..contact_count`; the step never
//!   leaves the defined range.
//! - An unanswered tri-state question blocks forward navigation; "No"
//!   does not.
//! - Storage read/parse failures degrade to fresh/empty state with a
//!   log line. The only fallible operation is archiving a submission,
//!   which leaves the session intact for retry.
//! - Archive observers are notified only after the durable write.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod export;
pub mod sequencer;
pub mod session_store;
pub mod store;
pub mod types;
pub mod validate;

// Re-exports
pub use types::{
    Answer, ContactInfo, ContactInfoPatch, MediaContact, PlatformQuestions,
    PlatformQuestionsPatch, ResponseId, SurveyResponse, SurveySession, DEFAULT_CONTACT_COUNT,
};
pub use sequencer::{InvalidStep, Stage, Step, Transition};
pub use session_store::{SurveyStore, SESSION_KEY};
pub use archive::{
    ArchiveError, ArchiveEvent, ArchiveWatcher, ResponseArchive, SubscriptionId, RESPONSES_KEY,
};
pub use export::{analytics, to_csv, to_json, Analytics};
pub use store::{FileStore, InMemoryStore, KeyValueStore};

/// Schema version for persisted survey payloads.
/// Increment on breaking changes to the session or response layout.
pub const SURVEY_SCHEMA_VERSION: &str = "1.0.0";
