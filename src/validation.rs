//! Validation Module
//!
//! Content rules for candidate profiles and the bio normalization applied
//! on every read path.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::models::UserRequest;

// == Public Constants ==
/// Maximum bio length in characters
pub const MAX_BIO_LENGTH: usize = 1000;

/// Substrings a bio may not contain (case-sensitive)
pub const BIO_DENYLIST: &[&str] = &["spam"];

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_]{3,20}$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

// == Validate ==
/// Checks a candidate profile, reporting the first rule it breaks.
///
/// Rules in order: username shape, email shape, bio length, bio denylist.
pub fn validate_user(candidate: &UserRequest) -> Result<(), ValidationError> {
    if !username_regex().is_match(&candidate.username) {
        return Err(ValidationError::InvalidUsername);
    }
    if !email_regex().is_match(&candidate.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if candidate.bio.chars().count() > MAX_BIO_LENGTH {
        return Err(ValidationError::BioTooLong);
    }
    if BIO_DENYLIST.iter().any(|term| candidate.bio.contains(term)) {
        return Err(ValidationError::BioRejected);
    }
    Ok(())
}

// == Normalize ==
/// Collapses whitespace runs in a bio into single spaces and trims the ends.
pub fn normalize_bio(bio: &str) -> String {
    bio.split_whitespace().collect::<Vec<_>>().join(" ")
}
