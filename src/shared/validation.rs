//! Validation Utilities

use validator::{Validate, ValidationError, ValidationErrors};

use super::error::AppError;

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    // field_errors() is a HashMap; keep the reported message stable
    messages.sort();

    AppError::Validation(
        messages
            .into_iter()
            .next()
            .unwrap_or_else(|| "Validation failed".into()),
    )
}

/// Reject ids made only of whitespace; `length(min = 1)` lets them through
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Run `validator` checks on a request body
pub fn validate<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(validation_error)
}
