//! Request payload validation.
//!
//! Pure functions only: nothing here touches the store, so every check can
//! run without holding a lock.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::store::UserUpdate;

/// A parsed JSON request body. Anything that is not a JSON object is
/// represented as an absent payload.
pub type Payload = Map<String, Value>;

/// Address shape: `local-part@domain.tld`, word characters, dots and hyphens
/// on both sides, ending in a dot-separated suffix.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern is a valid regex")
});

/// Keys accepted for the display name on creation.
const NAME_KEYS: [&str; 2] = ["name", "nombre"];

/// Errors produced while validating a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required fields missing, mistyped, or the payload itself is absent
    IncompleteData,
    /// Email is present but does not look like an address
    InvalidEmailFormat,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteData => write!(f, "Datos incompletos"),
            Self::InvalidEmailFormat => write!(f, "Formato de email inválido"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validated fields for a user about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Check that `candidate` matches the address pattern. No DNS lookups.
///
/// The match covers the whole string, so a trailing newline is rejected.
pub fn validate_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

/// Parse a raw request body into a payload.
///
/// Empty bodies, malformed JSON and non-object JSON all yield `None`.
pub fn parse_payload(body: &[u8]) -> Option<Payload> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Check that a creation payload carries both `name` and `email`.
///
/// Only presence is checked here; the email format is checked separately so
/// callers can report the two failures with different kinds.
pub fn validate_creation_payload(payload: Option<&Payload>) -> Result<NewUser, ValidationError> {
    let payload = payload.ok_or(ValidationError::IncompleteData)?;

    let name = NAME_KEYS
        .iter()
        .find_map(|key| payload.get(*key))
        .ok_or(ValidationError::IncompleteData)?;
    let name = trimmed_string(name)?;
    if name.is_empty() {
        return Err(ValidationError::IncompleteData);
    }

    let email = payload
        .get("email")
        .ok_or(ValidationError::IncompleteData)?;
    let email = trimmed_string(email)?;

    Ok(NewUser { name, email })
}

/// Turn an update payload into the set of fields to overwrite.
///
/// Fails with `IncompleteData` for an absent or empty payload and with
/// `InvalidEmailFormat` when a supplied email does not match. Unknown keys
/// (including `id`) are ignored.
pub fn validate_update_payload(payload: Option<&Payload>) -> Result<UserUpdate, ValidationError> {
    let payload = payload
        .filter(|p| !p.is_empty())
        .ok_or(ValidationError::IncompleteData)?;

    let name = NAME_KEYS
        .iter()
        .find_map(|key| payload.get(*key))
        .map(trimmed_string)
        .transpose()?;
    if name.as_deref().is_some_and(str::is_empty) {
        return Err(ValidationError::IncompleteData);
    }

    let email = payload.get("email").map(trimmed_string).transpose()?;
    if let Some(email) = &email
        && !validate_email(email)
    {
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(UserUpdate { name, email })
}

fn trimmed_string(value: &Value) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or(ValidationError::IncompleteData)
}
