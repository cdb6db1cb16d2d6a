//! Core types for the survey wizard.

pub mod answer;
pub mod contact;
pub mod response;
pub mod session;

pub use answer::Answer;
pub use contact::{
    ContactInfo, ContactInfoPatch, MediaContact, PlatformQuestions, PlatformQuestionsPatch,
};
pub use response::{ResponseId, SurveyResponse};
pub use session::{SurveySession, DEFAULT_CONTACT_COUNT};
