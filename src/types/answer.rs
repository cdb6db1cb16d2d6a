//! Tri-state answer type for yes/no survey questions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Answer to a yes/no question.
///
/// `Unanswered` is distinct from `No`. The step sequencer's branch rules
/// and the summary rendering both depend on this distinction, so it is
/// modeled as an explicit third variant rather than an `Option<bool>`.
///
/// Serializes as `null` / `true` / `false` to stay layout-compatible
/// with sessions persisted by earlier versions of the survey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Answer {
    /// Question has not been answered yet. Blocks forward navigation
    /// on steps that require an answer.
    #[default]
    Unanswered,
    /// Affirmative answer.
    Yes,
    /// Negative answer.
    No,
}

impl Answer {
    /// Whether an answer (either way) has been given.
    pub fn is_answered(&self) -> bool {
        !matches!(self, Self::Unanswered)
    }

    /// Whether this is an affirmative answer.
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }

    /// Whether this is a negative answer.
    pub fn is_no(&self) -> bool {
        matches!(self, Self::No)
    }

    /// Convert to an optional boolean (`None` = unanswered).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Unanswered => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl From<Option<bool>> for Answer {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unanswered,
            Some(true) => Self::Yes,
            Some(false) => Self::No,
        }
    }
}

impl From<Answer> for Option<bool> {
    fn from(value: Answer) -> Self {
        value.as_bool()
    }
}

impl fmt::Display for Answer {
    /// Summary-view rendering: "Yes" / "No" / "Not answered".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unanswered => write!(f, "Not answered"),
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
        }
    }
}
