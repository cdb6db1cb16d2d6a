//! Archived survey responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::SurveySession;

/// Opaque unique identifier for an archived response.
///
/// Generated as a base36 millisecond timestamp prefix plus a random
/// suffix. Collision probability is negligible but not formally
/// guaranteed zero.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(String);

impl ResponseId {
    /// Generate a fresh id from the current time plus random entropy.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u128;
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", base36(millis), &suffix[..10]))
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ResponseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

fn base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ascii")
}

/// An archived, immutable snapshot of a submitted session.
///
/// Created exactly once by [`crate::ResponseArchive::append`]; never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    /// Unique response id.
    pub id: ResponseId,
    /// Submission timestamp (serialized as ISO-8601 / RFC 3339).
    pub submitted_at: DateTime<Utc>,
    /// Frozen copy of the session at submission time.
    pub data: SurveySession,
}

impl SurveyResponse {
    /// Snapshot `session` with a fresh id and the current timestamp.
    pub fn from_session(session: &SurveySession) -> Self {
        Self {
            id: ResponseId::generate(),
            submitted_at: Utc::now(),
            data: session.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36_encoding() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1234567890), "kf12oi");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ResponseId::generate();
        let b = ResponseId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_response_snapshots_session_by_value() {
        let mut session = SurveySession::new();
        session.current_contact_mut().contact_info.name = "Ada".to_string();

        let response = SurveyResponse::from_session(&session);

        // Later mutation of the live session must not leak into the snapshot.
        session.current_contact_mut().contact_info.name = "Grace".to_string();
        assert_eq!(response.data.media_contacts()[0].contact_info.name, "Ada");
    }

    #[test]
    fn test_submitted_at_serializes_as_iso8601() {
        let response = SurveyResponse::from_session(&SurveySession::new());
        let json = serde_json::to_value(&response).unwrap();

        let stamp = json["submittedAt"].as_str().unwrap();
        assert!(stamp.contains('T'));
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
