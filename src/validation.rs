//! Input predicates run before any storage or network access

use crate::error::ValidationError;
use crate::types::upload::{has_csv_extension, UploadFile, CSV_CONTENT_TYPE};
use regex::Regex;
use std::sync::LazyLock;

/// Largest accepted upload: 10 MiB
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Email syntax check, case-insensitive
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a digit
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// CSV by declared type or by extension; either is enough
pub fn is_csv(name: &str, content_type: Option<&str>) -> bool {
    content_type == Some(CSV_CONTENT_TYPE) || has_csv_extension(name)
}

pub fn within_size_limit(size: u64, limit: u64) -> bool {
    size <= limit
}

pub fn validate_threshold(threshold: f64) -> Result<(), ValidationError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ValidationError::ThresholdOutOfRange)
    }
}

/// Checks run on submit, in the order the upload form reports them
pub fn validate_upload(file: Option<&UploadFile>, limit: u64) -> Result<&UploadFile, ValidationError> {
    let file = file.ok_or(ValidationError::NoFile)?;

    if !is_csv(&file.name, file.content_type.as_deref()) {
        return Err(ValidationError::NotCsv);
    }

    if !within_size_limit(file.size(), limit) {
        return Err(ValidationError::FileTooLarge {
            size: file.size(),
            limit,
        });
    }

    Ok(file)
}
