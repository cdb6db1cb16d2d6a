//! Per-contact data: contact details and platform question answers.

use serde::{Deserialize, Serialize};

use super::Answer;

/// Contact details for a single surveyed media contact.
///
/// All fields are free text at the model level. Format validation
/// (email shape, 5-or-9-digit zip) is the presentation layer's job
/// before committing values here; see [`crate::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// US zip code.
    pub zip_code: String,
    /// Name of the contact's non-profit organization.
    pub organization_name: String,
}

impl ContactInfo {
    /// Whether the contact-info step's minimum fields are populated.
    pub fn has_contact_fields(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.zip_code.trim().is_empty()
    }

    /// Whether the organization step's minimum field is populated.
    pub fn has_organization(&self) -> bool {
        !self.organization_name.trim().is_empty()
    }
}

/// Partial update for [`ContactInfo`]. Fields left as `None` are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfoPatch {
    /// New name, if any.
    pub name: Option<String>,
    /// New email, if any.
    pub email: Option<String>,
    /// New zip code, if any.
    pub zip_code: Option<String>,
    /// New organization name, if any.
    pub organization_name: Option<String>,
}

impl ContactInfoPatch {
    /// Merge this patch into `target`.
    pub fn apply(self, target: &mut ContactInfo) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(email) = self.email {
            target.email = email;
        }
        if let Some(zip_code) = self.zip_code {
            target.zip_code = zip_code;
        }
        if let Some(organization_name) = self.organization_name {
            target.organization_name = organization_name;
        }
    }
}

/// Answers to the platform questions for one contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformQuestions {
    /// Is the referral resource a priority to the contact as a CHW?
    #[serde(rename = "isPriorityAsCHW")]
    pub is_priority_as_chw: Answer,
    /// Does the contact use a referral platform?
    pub uses_referral_platform: Answer,
    /// Is the platform they use efficient and accurate?
    pub is_platform_efficient: Answer,
    /// Free-text reason, collected only when the platform is not efficient.
    pub why_not_efficient: String,
}

/// Partial update for [`PlatformQuestions`]. Fields left as `None` are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformQuestionsPatch {
    /// New priority answer, if any.
    #[serde(rename = "isPriorityAsCHW")]
    pub is_priority_as_chw: Option<Answer>,
    /// New platform-usage answer, if any.
    pub uses_referral_platform: Option<Answer>,
    /// New efficiency answer, if any.
    pub is_platform_efficient: Option<Answer>,
    /// New inefficiency reason, if any.
    pub why_not_efficient: Option<String>,
}

impl PlatformQuestionsPatch {
    /// Merge this patch into `target`.
    pub fn apply(self, target: &mut PlatformQuestions) {
        if let Some(answer) = self.is_priority_as_chw {
            target.is_priority_as_chw = answer;
        }
        if let Some(answer) = self.uses_referral_platform {
            target.uses_referral_platform = answer;
        }
        if let Some(answer) = self.is_platform_efficient {
            target.is_platform_efficient = answer;
        }
        if let Some(reason) = self.why_not_efficient {
            target.why_not_efficient = reason;
        }
    }
}

/// One surveyed media contact: contact details plus question answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContact {
    /// Contact details.
    pub contact_info: ContactInfo,
    /// Platform question answers.
    pub platform_questions: PlatformQuestions,
}
