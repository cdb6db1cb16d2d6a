//! Format checks for contact form fields.
//!
//! The data model stores free text; these helpers are for the
//! presentation layer to apply BEFORE committing values via
//! [`crate::SurveyStore::update_contact_info`]. The patterns match the
//! ones the original contact form enforced.

use regex_lite::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn zip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip pattern"))
}

/// Whether `email` looks like an email address (`local@domain.tld`).
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Whether `zip` is a 5-digit or 9-digit (ZIP+4) US zip code.
pub fn is_valid_zip(zip: &str) -> bool {
    zip_regex().is_match(zip)
}
