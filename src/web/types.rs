//! Request and response bodies of the `web` module and the parsing of their fields.

use derive_more::Display;
use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable subscription request.
/// The email is kept optional so that a missing field is reported the same way as an invalid one.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

impl SubscribeRequest {
    pub fn valid_email(self) -> Result<ValidEmail, DataParsingError> {
        let email = self.email.ok_or(DataParsingError::EmailMissing)?;
        ValidEmail::parse(email)
    }
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: &'static str,
}

impl SubscribeResponse {
    pub fn subscribed() -> Self {
        Self {
            success: true,
            message: "Successfully subscribed!",
        }
    }
}

/// Validated Subscriber Email
///
/// Only a syntactic sanity check: something without whitespace or `@`, an `@`,
/// and a domain containing at least one dot.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        if regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid(value.to_owned()))
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email is missing")]
    EmailMissing,
    #[error("email invalid: {0}")]
    EmailInvalid(String),
    #[error("request body could not be read: {0}")]
    BodyRejected(String),
}
