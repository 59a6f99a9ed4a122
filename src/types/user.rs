//! Simulated account and session records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account created through signup.
///
/// The password is kept in plaintext, matching the demo's storage layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub email: String,
    pub password: String,
    pub registered_on: DateTime<Utc>,
}

impl RegisteredUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            registered_on: Utc::now(),
        }
    }
}

/// Authenticated session established after OTP verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub auth_token: String,
    pub user_email: String,
    pub user_name: String,
}

impl Session {
    /// Display name derived from the email local part
    pub fn user_name_for(email: &str) -> String {
        email.split('@').next().unwrap_or(email).to_string()
    }
}

/// One-time passcode waiting for the second login step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOtp {
    pub code: String,
    pub email: String,
}
