//! Error taxonomy shared by the workflows

use crate::auth::Redirect;
use thiserror::Error;

/// Input rejected before any I/O. Always recoverable; the caller stays where it is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter your password")]
    MissingPassword,

    #[error("Please create a password")]
    MissingNewPassword,

    #[error("Password must be at least 8 characters with uppercase, lowercase, and number")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter the OTP")]
    MissingOtp,

    #[error("Please select a CSV file to upload")]
    NoFile,

    #[error("Please upload a valid CSV file")]
    NotCsv,

    #[error("File size exceeds 10MB limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Detection threshold must be between 0 and 1")]
    ThresholdOutOfRange,
}

/// Credential or passcode failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Account not found. Please register first.")]
    AccountNotFound { redirect: Redirect },

    #[error("Email already registered. Please login instead.")]
    AlreadyRegistered { redirect: Redirect },

    #[error("Incorrect password. Please try again.")]
    IncorrectPassword,

    #[error("Invalid OTP. Please try again.")]
    InvalidOtp,
}

impl AuthError {
    /// Delayed navigation the UI should perform after showing the message
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            AuthError::AccountNotFound { redirect } | AuthError::AlreadyRegistered { redirect } => {
                Some(redirect)
            }
            _ => None,
        }
    }
}

/// Failures talking to the analysis service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("HTTP error {0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedBody(String),

    #[error("Failed to encode request: {0}")]
    Encode(String),
}

/// Report download attempted with nothing to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No analysis results available to download")]
pub struct NoResultsError;

/// Failures of `UploadWorkflow::download_report`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error(transparent)]
    NoResults(#[from] NoResultsError),

    #[error("Failed to serialize report: {0}")]
    Serialize(String),
}

/// Backing store failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value under '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Rejections from `UploadWorkflow::submit`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An analysis is already in progress or displayed; start a new analysis first")]
    Busy,
}
