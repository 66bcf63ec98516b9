//! Field-level validation shared by the account and profile services.
//!
//! Each check returns `None` when the value is acceptable and a human
//! readable reason otherwise. Services collect the reasons and surface them
//! as one invalid-parameter error, so a single round trip reports every
//! problem with the input.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum accepted length for a person name.
pub const PERSON_NAME_MAX_LENGTH: usize = 100;
/// Maximum accepted length for an institute name.
pub const INSTITUTE_NAME_MAX_LENGTH: usize = 64;
/// Maximum accepted length for an email address.
pub const EMAIL_MAX_LENGTH: usize = 254;
/// Maximum accepted length for a user identifier.
pub const GOOGLE_ID_MAX_LENGTH: usize = 254;
/// Maximum accepted length for a nationality.
pub const NATIONALITY_MAX_LENGTH: usize = 55;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static GOOGLE_ID_RE: OnceLock<Regex> = OnceLock::new();
static NATIONALITY_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately loose; the mail system is the final authority.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn google_id_regex() -> &'static Regex {
    GOOGLE_ID_RE.get_or_init(|| {
        let pattern = r"^[a-zA-Z0-9@._-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("google id regex failed to compile: {error}"))
    })
}

fn nationality_regex() -> &'static Regex {
    NATIONALITY_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z][A-Za-z ,.()'-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("nationality regex failed to compile: {error}"))
    })
}

fn too_long(value: &str, field: &str, max: usize) -> Option<String> {
    (value.chars().count() > max).then(|| {
        format!("'{value}' is not acceptable as {field} because it is too long (maximum {max} characters)")
    })
}

/// Check a person name (account holder or profile short name).
#[must_use]
pub fn person_name(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("The person name field is empty".to_owned());
    }
    too_long(value, "a person name", PERSON_NAME_MAX_LENGTH)
}

/// Check an email address.
#[must_use]
pub fn email(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("The email field is empty".to_owned());
    }
    if let Some(reason) = too_long(value, "an email", EMAIL_MAX_LENGTH) {
        return Some(reason);
    }
    (!email_regex().is_match(value))
        .then(|| format!("'{value}' is not acceptable as an email because it is not in the correct format"))
}

/// Check an institute name.
#[must_use]
pub fn institute(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("The institute field is empty".to_owned());
    }
    too_long(value, "an institute name", INSTITUTE_NAME_MAX_LENGTH)
}

/// Check a user identifier.
#[must_use]
pub fn google_id(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("The user identifier field is empty".to_owned());
    }
    if let Some(reason) = too_long(value, "a user identifier", GOOGLE_ID_MAX_LENGTH) {
        return Some(reason);
    }
    (!google_id_regex().is_match(value)).then(|| {
        format!("'{value}' is not acceptable as a user identifier because it contains invalid characters")
    })
}

/// Check a nationality.
#[must_use]
pub fn nationality(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("The nationality field is empty".to_owned());
    }
    if let Some(reason) = too_long(value, "a nationality", NATIONALITY_MAX_LENGTH) {
        return Some(reason);
    }
    (!nationality_regex().is_match(value))
        .then(|| format!("'{value}' is not acceptable as a nationality"))
}
