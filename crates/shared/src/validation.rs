//! Common validation utilities.

use rust_decimal::Decimal;
use std::collections::HashSet;
use validator::ValidationError;

/// Maximum length of a single settings token (category, card type, issuer).
pub const MAX_TOKEN_LENGTH: usize = 64;

lazy_static::lazy_static! {
    /// Settings tokens: alphanumeric words joined by `_`, `-` or single spaces.
    pub static ref TOKEN_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9_\- ]*[A-Za-z0-9])?$").unwrap();
}

/// Validates that a decimal amount is zero or positive.
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Value must be non-negative".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a string contains at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a single registry token.
pub fn validate_token(value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_TOKEN_LENGTH || !TOKEN_REGEX.is_match(value) {
        let mut err = ValidationError::new("token_format");
        err.message = Some(
            format!(
                "'{}' must be 1-{} alphanumeric characters, '_', '-' or inner spaces",
                value, MAX_TOKEN_LENGTH
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Validates an ordered set of registry tokens: non-empty, well-formed, unique.
pub fn validate_token_set(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        let mut err = ValidationError::new("token_set_empty");
        err.message = Some("At least one value is required".into());
        return Err(err);
    }

    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        validate_token(value)?;
        if !seen.insert(value.as_str()) {
            let mut err = ValidationError::new("token_set_duplicate");
            err.message = Some(format!("Duplicate value '{}'", value).into());
            return Err(err);
        }
    }
    Ok(())
}
