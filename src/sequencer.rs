//! Step sequencing for the survey wizard.
//!
//! Pure functions mapping the current `(step, contact index, answers)`
//! to the next valid `(step, contact index)`. The [`crate::SurveyStore`]
//! applies the transitions computed here; nothing in this module
//! mutates or persists state.
//!
//! ## Branch rules
//!
//! Linear advance is `step + 1`, with conditional skips layered on top,
//! each evaluated against the CURRENT contact's answers:
//!
//! - A contact who does not use a referral platform is never asked the
//!   efficiency question or the inefficiency reason.
//! - A contact whose platform is efficient skips the reason step, and
//!   any previously entered reason is cleared.
//! - Leaving the reason step loops back to the next contact's
//!   contact-info step, or to the summary after the last contact.
//!
//! Back navigation is a plain decrement and does not re-run skip rules,
//! so backing up can land on a step forward traversal would have
//! skipped. That matches the original wizard's behavior and is kept
//! deliberately.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::SurveySession;

/// A wizard step, strictly ordered.
///
/// The integer discriminants are part of the persisted layout:
/// sessions store the step as this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Step {
    /// Intro screen shown before any questions.
    Splash = 0,
    /// "Is the referral resource a priority to you as a CHW?"
    PlatformPriority = 1,
    /// "Do you use a referral platform?"
    PlatformUsage = 2,
    /// "Is the platform you utilize efficient and accurate?"
    PlatformEfficiency = 3,
    /// Free-text reason when the platform is not efficient.
    WhyNotEfficient = 4,
    /// Name / email / zip for the current contact.
    ContactInfo = 5,
    /// Organization name for the current contact.
    OrganizationInfo = 6,
    /// Review screen before submission.
    Summary = 7,
    /// Terminal step, reached only by submitting from the summary.
    ThankYou = 8,
}

impl Step {
    /// First step of the wizard.
    pub const FIRST: Step = Step::Splash;
    /// Terminal step of the wizard.
    pub const LAST: Step = Step::ThankYou;

    /// Integer index of this step.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Step for a given index, if defined.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Splash),
            1 => Some(Self::PlatformPriority),
            2 => Some(Self::PlatformUsage),
            3 => Some(Self::PlatformEfficiency),
            4 => Some(Self::WhyNotEfficient),
            5 => Some(Self::ContactInfo),
            6 => Some(Self::OrganizationInfo),
            7 => Some(Self::Summary),
            8 => Some(Self::ThankYou),
            _ => None,
        }
    }

    /// Next step in linear order, saturating at [`Step::ThankYou`].
    pub fn successor(&self) -> Step {
        Self::from_index(self.index() + 1).unwrap_or(Self::LAST)
    }

    /// Previous step in linear order, saturating at [`Step::Splash`].
    pub fn predecessor(&self) -> Step {
        match self.index().checked_sub(1) {
            Some(index) => Self::from_index(index).unwrap_or(Self::FIRST),
            None => Self::FIRST,
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.index()
    }
}

impl TryFrom<u8> for Step {
    type Error = InvalidStep;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(InvalidStep(index))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Splash => "splash",
            Self::PlatformPriority => "platform_priority",
            Self::PlatformUsage => "platform_usage",
            Self::PlatformEfficiency => "platform_efficiency",
            Self::WhyNotEfficient => "why_not_efficient",
            Self::ContactInfo => "contact_info",
            Self::OrganizationInfo => "organization_info",
            Self::Summary => "summary",
            Self::ThankYou => "thank_you",
        };
        write!(f, "{name}")
    }
}

/// Error for an undefined step index in a persisted payload.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("invalid step index: {0}")]
pub struct InvalidStep(pub u8);

/// Result of a sequencer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Step to move to.
    pub step: Step,
    /// Contact index after the transition.
    pub contact_index: usize,
    /// Whether the current contact's `why_not_efficient` text must be
    /// cleared (the reason step was skipped because the platform is
    /// efficient).
    pub clear_reason: bool,
}

impl Transition {
    fn to(step: Step, session: &SurveySession) -> Self {
        Self {
            step,
            contact_index: session.current_contact_index(),
            clear_reason: false,
        }
    }
}

/// Compute the forward transition from the session's current position.
///
/// Returns `None` when the current step's required answer is missing:
/// an unanswered tri-state question blocks progress, as do empty
/// required contact fields. The reason step has no minimum and always
/// permits leaving.
pub fn advance(session: &SurveySession) -> Option<Transition> {
    let contact = session.current_contact();
    let questions = &contact.platform_questions;

    let transition = match session.current_step() {
        Step::Splash => Transition::to(Step::PlatformPriority, session),
        Step::PlatformPriority => {
            if !questions.is_priority_as_chw.is_answered() {
                return None;
            }
            Transition::to(Step::PlatformUsage, session)
        }
        Step::PlatformUsage => {
            if !questions.uses_referral_platform.is_answered() {
                return None;
            }
            if questions.uses_referral_platform.is_no() {
                // No platform: the efficiency question and the reason
                // step are both skipped for this contact.
                Transition::to(Step::ContactInfo, session)
            } else {
                Transition::to(Step::PlatformEfficiency, session)
            }
        }
        Step::PlatformEfficiency => {
            if questions.uses_referral_platform.is_no() {
                // Reachable only by jumping or backing up; pass through
                // without requiring input.
                Transition::to(Step::ContactInfo, session)
            } else if !questions.is_platform_efficient.is_answered() {
                return None;
            } else if questions.is_platform_efficient.is_yes() {
                // Efficient: skip the reason step and drop any stale reason.
                Transition {
                    clear_reason: true,
                    ..Transition::to(Step::ContactInfo, session)
                }
            } else {
                Transition::to(Step::WhyNotEfficient, session)
            }
        }
        Step::WhyNotEfficient => {
            if questions.uses_referral_platform.is_no() || !questions.is_platform_efficient.is_no()
            {
                // Skipped for this contact; pass through.
                Transition::to(Step::ContactInfo, session)
            } else {
                // Loop-back point: on to the next contact, or the
                // summary once the last contact is done.
                move_to_next_contact(session)
            }
        }
        Step::ContactInfo => {
            if !contact.contact_info.has_contact_fields() {
                return None;
            }
            Transition::to(Step::OrganizationInfo, session)
        }
        Step::OrganizationInfo => {
            if !contact.contact_info.has_organization() {
                return None;
            }
            Transition::to(Step::Summary, session)
        }
        Step::Summary => Transition::to(Step::ThankYou, session),
        // Terminal: no forward transition.
        Step::ThankYou => return None,
    };

    Some(transition)
}

/// Compute the backward transition: one step back, floor at splash.
///
/// Skip rules are intentionally not re-applied.
pub fn retreat(session: &SurveySession) -> Transition {
    Transition::to(session.current_step().predecessor(), session)
}

/// Per-contact loop: move to the next contact's contact-info step, or
/// to the summary when the current contact is the last one.
pub fn move_to_next_contact(session: &SurveySession) -> Transition {
    if session.is_last_contact() {
        Transition::to(Step::Summary, session)
    } else {
        Transition {
            step: Step::ContactInfo,
            contact_index: session.current_contact_index() + 1,
            clear_reason: false,
        }
    }
}

/// Whether the current step permits forward navigation right now.
pub fn can_advance(session: &SurveySession) -> bool {
    advance(session).is_some()
}

/// Progress grouping for the wizard's progress indicator.
///
/// The four platform questions render as one stage; splash has no
/// stage and the thank-you screen counts as the summary stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The yes/no platform questions plus the reason step.
    PlatformQuestions,
    /// Contact details.
    ContactInfo,
    /// Organization details.
    Organization,
    /// Review and submission.
    Summary,
}

impl Stage {
    /// Stage for a step; `None` for the splash screen.
    pub fn of(step: Step) -> Option<Self> {
        match step {
            Step::Splash => None,
            Step::PlatformPriority
            | Step::PlatformUsage
            | Step::PlatformEfficiency
            | Step::WhyNotEfficient => Some(Self::PlatformQuestions),
            Step::ContactInfo => Some(Self::ContactInfo),
            Step::OrganizationInfo => Some(Self::Organization),
            Step::Summary | Step::ThankYou => Some(Self::Summary),
        }
    }

    /// Progress percentage when this stage is active.
    pub fn percent(&self) -> u8 {
        match self {
            Self::PlatformQuestions => 25,
            Self::ContactInfo => 50,
            Self::Organization => 75,
            Self::Summary => 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Answer;

    fn session_at(step: Step) -> SurveySession {
        let mut session = SurveySession::new();
        session.set_step(step);
        session
    }

    #[test]
    fn test_step_index_round_trip() {
        for index in 0..=8 {
            let step = Step::from_index(index).unwrap();
            assert_eq!(step.index(), index);
        }
        assert!(Step::from_index(9).is_none());
        assert!(Step::try_from(42u8).is_err());
    }

    #[test]
    fn test_successor_and_predecessor_saturate() {
        assert_eq!(Step::ThankYou.successor(), Step::ThankYou);
        assert_eq!(Step::Splash.predecessor(), Step::Splash);
        assert_eq!(Step::Splash.successor(), Step::PlatformPriority);
        assert_eq!(Step::Summary.predecessor(), Step::OrganizationInfo);
    }

    #[test]
    fn test_unanswered_priority_blocks() {
        let session = session_at(Step::PlatformPriority);
        assert!(advance(&session).is_none());
    }

    #[test]
    fn test_answered_no_is_not_blocked() {
        let mut session = session_at(Step::PlatformPriority);
        session.current_contact_mut().platform_questions.is_priority_as_chw = Answer::No;
        assert_eq!(advance(&session).unwrap().step, Step::PlatformUsage);
    }

    #[test]
    fn test_no_platform_skips_efficiency_and_reason() {
        let mut session = session_at(Step::PlatformUsage);
        session.current_contact_mut().platform_questions.uses_referral_platform = Answer::No;
        assert_eq!(advance(&session).unwrap().step, Step::ContactInfo);
    }

    #[test]
    fn test_uses_platform_goes_to_efficiency() {
        let mut session = session_at(Step::PlatformUsage);
        session.current_contact_mut().platform_questions.uses_referral_platform = Answer::Yes;
        assert_eq!(advance(&session).unwrap().step, Step::PlatformEfficiency);
    }

    #[test]
    fn test_efficient_platform_skips_reason_and_clears_it() {
        let mut session = session_at(Step::PlatformEfficiency);
        {
            let questions = &mut session.current_contact_mut().platform_questions;
            questions.uses_referral_platform = Answer::Yes;
            questions.is_platform_efficient = Answer::Yes;
            questions.why_not_efficient = "stale".to_string();
        }

        let transition = advance(&session).unwrap();
        assert_eq!(transition.step, Step::ContactInfo);
        assert!(transition.clear_reason);
    }

    #[test]
    fn test_inefficient_platform_reaches_reason_step() {
        let mut session = session_at(Step::PlatformEfficiency);
        {
            let questions = &mut session.current_contact_mut().platform_questions;
            questions.uses_referral_platform = Answer::Yes;
            questions.is_platform_efficient = Answer::No;
        }

        let transition = advance(&session).unwrap();
        assert_eq!(transition.step, Step::WhyNotEfficient);
        assert!(!transition.clear_reason);
    }

    #[test]
    fn test_efficiency_entry_passes_through_for_non_users() {
        // Reached via back navigation or a jump; must not demand input.
        let mut session = session_at(Step::PlatformEfficiency);
        session.current_contact_mut().platform_questions.uses_referral_platform = Answer::No;
        assert_eq!(advance(&session).unwrap().step, Step::ContactInfo);
    }

    #[test]
    fn test_reason_step_loops_to_next_contact() {
        let mut session = session_at(Step::WhyNotEfficient);
        {
            let questions = &mut session.current_contact_mut().platform_questions;
            questions.uses_referral_platform = Answer::Yes;
            questions.is_platform_efficient = Answer::No;
        }

        let transition = advance(&session).unwrap();
        assert_eq!(transition.step, Step::ContactInfo);
        assert_eq!(transition.contact_index, 1);
    }

    #[test]
    fn test_reason_step_on_last_contact_goes_to_summary() {
        let mut session = SurveySession::with_contact_count(2);
        session.set_step(Step::WhyNotEfficient);
        session.set_contact_index(1);
        {
            let questions = &mut session.current_contact_mut().platform_questions;
            questions.uses_referral_platform = Answer::Yes;
            questions.is_platform_efficient = Answer::No;
        }

        let transition = advance(&session).unwrap();
        assert_eq!(transition.step, Step::Summary);
        assert_eq!(transition.contact_index, 1);
    }

    #[test]
    fn test_contact_info_requires_minimum_fields() {
        let mut session = session_at(Step::ContactInfo);
        assert!(advance(&session).is_none());

        {
            let info = &mut session.current_contact_mut().contact_info;
            info.name = "Ada".to_string();
            info.email = "ada@example.org".to_string();
            info.zip_code = "12345".to_string();
        }
        assert_eq!(advance(&session).unwrap().step, Step::OrganizationInfo);
    }

    #[test]
    fn test_organization_requires_name() {
        let mut session = session_at(Step::OrganizationInfo);
        assert!(advance(&session).is_none());

        session.current_contact_mut().contact_info.organization_name = "Health First".to_string();
        assert_eq!(advance(&session).unwrap().step, Step::Summary);
    }

    #[test]
    fn test_thank_you_is_terminal() {
        let session = session_at(Step::ThankYou);
        assert!(advance(&session).is_none());
    }

    #[test]
    fn test_retreat_floors_at_splash() {
        let session = session_at(Step::Splash);
        assert_eq!(retreat(&session).step, Step::Splash);
    }

    #[test]
    fn test_retreat_does_not_reapply_skips() {
        // Backing out of contact info lands on the reason step even for
        // a contact whose platform is efficient.
        let mut session = session_at(Step::ContactInfo);
        session.current_contact_mut().platform_questions.is_platform_efficient = Answer::Yes;
        assert_eq!(retreat(&session).step, Step::WhyNotEfficient);
    }

    #[test]
    fn test_move_to_next_contact_at_last_goes_to_summary() {
        let mut session = SurveySession::new();
        session.set_contact_index(session.contact_count() - 1);

        let transition = move_to_next_contact(&session);
        assert_eq!(transition.step, Step::Summary);
        assert_eq!(transition.contact_index, session.contact_count() - 1);
    }

    #[test]
    fn test_stage_mapping() {
        assert_eq!(Stage::of(Step::Splash), None);
        assert_eq!(Stage::of(Step::WhyNotEfficient), Some(Stage::PlatformQuestions));
        assert_eq!(Stage::of(Step::ContactInfo), Some(Stage::ContactInfo));
        assert_eq!(Stage::of(Step::ThankYou), Some(Stage::Summary));
        assert_eq!(Stage::PlatformQuestions.percent(), 25);
        assert_eq!(Stage::Summary.percent(), 100);
    }
}
