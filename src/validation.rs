//! Input checks applied to request bodies before anything is persisted.

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::AppError;

/// Trims `value` and rejects it when nothing is left.
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{field}: must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Accepts `local@domain.tld` shaped addresses without whitespace.
pub fn email(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    let invalid = || AppError::invalid_input(format!("{field}: must be a valid email address"));
    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(invalid());
    };
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

/// Validates each address and drops case-insensitive duplicates, keeping
/// the first spelling seen.
pub fn distinct_emails(field: &str, values: &[String]) -> Result<Vec<String>, AppError> {
    let mut emails: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let email = email(field, value)?;
        if !emails.iter().any(|seen| seen.eq_ignore_ascii_case(&email)) {
            emails.push(email);
        }
    }
    Ok(emails)
}

pub fn http_url(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    let invalid = || AppError::invalid_input(format!("{field}: must be an absolute http(s) URL"));
    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

pub fn date_range(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), AppError> {
    if ends_at < starts_at {
        return Err(AppError::invalid_input(
            "ends_at: must not be before starts_at",
        ));
    }
    Ok(())
}
