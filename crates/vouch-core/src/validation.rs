//! Input validation for the lifecycle operations.

use std::collections::BTreeMap;

use validator::ValidateEmail;

use crate::ServiceError;

/// Accepted range for a per-criterion rating value, inclusive.
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

pub(crate) fn require_email(
    field: &'static str,
    value: &str,
) -> Result<(), ServiceError> {
    if !value.validate_email() {
        return Err(ServiceError::validation(
            field,
            format!("'{}' is not a valid email address", value),
        ));
    }
    Ok(())
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Check a submitted ratings map: non-empty, named criteria, every value
/// finite and within the accepted range.
pub fn validate_ratings(ratings: &BTreeMap<String, f64>) -> Result<(), ServiceError> {
    if ratings.is_empty() {
        return Err(ServiceError::validation(
            "ratings",
            "at least one criterion is required",
        ));
    }
    for (criterion, value) in ratings {
        if criterion.trim().is_empty() {
            return Err(ServiceError::validation(
                "ratings",
                "criterion names must not be empty",
            ));
        }
        if !value.is_finite() || *value < RATING_MIN || *value > RATING_MAX {
            return Err(ServiceError::validation(
                "ratings",
                format!(
                    "'{}' must be between {} and {}, got {}",
                    criterion, RATING_MIN, RATING_MAX, value
                ),
            ));
        }
    }
    Ok(())
}
