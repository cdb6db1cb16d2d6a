//! Export and aggregate statistics over archived responses.
//!
//! Pure functions over a slice of [`SurveyResponse`] records, plus
//! convenience wrappers on [`ResponseArchive`] that read the archive
//! on demand. Exported files are consumed by the user, not parsed back
//! by the program.

use serde::Serialize;

use crate::archive::ResponseArchive;
use crate::store::KeyValueStore;
use crate::types::{Answer, SurveyResponse};

/// CSV header row, one column set per (response, contact) pair.
const CSV_HEADERS: [&str; 10] = [
    "ID",
    "Submitted At",
    "Contact Index",
    "Name",
    "Email",
    "Zip Code",
    "Is Priority",
    "Uses Platform",
    "Is Efficient",
    "Why Not Efficient",
];

/// Serialize responses as pretty-printed JSON.
///
/// An empty archive serializes to `[]`. The output mirrors the
/// in-memory shape exactly.
pub fn to_json(responses: &[SurveyResponse]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(responses)
}

/// Flatten responses into CSV, one row per (response, contact) pair.
///
/// Every cell is quoted with internal quote-doubling (RFC 4180 style).
/// An empty archive produces an empty string, NOT a zero-row CSV with
/// headers; callers treat the empty string as "nothing to export".
pub fn to_csv(responses: &[SurveyResponse]) -> String {
    if responses.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(1 + responses.len());
    lines.push(CSV_HEADERS.map(csv_cell).join(","));

    for response in responses {
        for (index, contact) in response.data.media_contacts().iter().enumerate() {
            let questions = &contact.platform_questions;
            let row = [
                response.id.to_string(),
                response.submitted_at.to_rfc3339(),
                index.to_string(),
                contact.contact_info.name.clone(),
                contact.contact_info.email.clone(),
                contact.contact_info.zip_code.clone(),
                answer_cell(questions.is_priority_as_chw).to_string(),
                answer_cell(questions.uses_referral_platform).to_string(),
                answer_cell(questions.is_platform_efficient).to_string(),
                questions.why_not_efficient.clone(),
            ]
            .map(|cell| csv_cell(&cell))
            .join(",");
            lines.push(row);
        }
    }

    lines.join("\n")
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn answer_cell(answer: Answer) -> &'static str {
    match answer {
        Answer::Yes => "true",
        Answer::No => "false",
        Answer::Unanswered => "",
    }
}

/// Aggregate statistics over all archived contacts, pooled across
/// responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Number of archived responses.
    pub total_responses: usize,
    /// Number of contacts across all responses.
    pub total_contacts: usize,
    /// Percent of contacts answering yes to the priority question
    /// (denominator: all contacts).
    pub is_priority_percentage: f64,
    /// Percent of contacts using a referral platform
    /// (denominator: all contacts).
    pub uses_platform_percentage: f64,
    /// Percent of platform users who find their platform efficient
    /// (denominator: platform users only; 0 when there are none).
    pub is_efficient_percentage: f64,
    /// Non-empty free-text reasons from contacts whose platform is not
    /// efficient.
    pub inefficiency_reasons: Vec<String>,
}

/// Compute aggregate statistics over the given responses.
///
/// Zero-division safe: with no contacts (or no platform users) the
/// corresponding percentages are 0, never NaN.
pub fn analytics(responses: &[SurveyResponse]) -> Analytics {
    let total_responses = responses.len();

    let contacts: Vec<_> = responses
        .iter()
        .flat_map(|response| response.data.media_contacts())
        .collect();
    let total_contacts = contacts.len();

    let is_priority_count = contacts
        .iter()
        .filter(|c| c.platform_questions.is_priority_as_chw.is_yes())
        .count();
    let uses_platform_count = contacts
        .iter()
        .filter(|c| c.platform_questions.uses_referral_platform.is_yes())
        .count();
    let is_efficient_count = contacts
        .iter()
        .filter(|c| c.platform_questions.is_platform_efficient.is_yes())
        .count();

    let inefficiency_reasons = contacts
        .iter()
        .filter(|c| {
            c.platform_questions.is_platform_efficient.is_no()
                && !c.platform_questions.why_not_efficient.is_empty()
        })
        .map(|c| c.platform_questions.why_not_efficient.clone())
        .collect();

    Analytics {
        total_responses,
        total_contacts,
        is_priority_percentage: percentage(is_priority_count, total_contacts),
        uses_platform_percentage: percentage(uses_platform_count, total_contacts),
        is_efficient_percentage: percentage(is_efficient_count, uses_platform_count),
        inefficiency_reasons,
    }
}

fn percentage(count: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (count as f64 / denominator as f64) * 100.0
    }
}

impl<S: KeyValueStore> ResponseArchive<S> {
    /// [`to_json`] over the current archive contents.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        to_json(&self.list())
    }

    /// [`to_csv`] over the current archive contents.
    pub fn export_csv(&self) -> String {
        to_csv(&self.list())
    }

    /// [`analytics`] over the current archive contents.
    pub fn analytics(&self) -> Analytics {
        analytics(&self.list())
    }
}
