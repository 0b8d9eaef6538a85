//! Shared field checks for the `validator` derive, plus a flattening helper
//! so a form can show one message per field.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required."));
    }
    Ok(())
}

/// Rejects strings containing any whitespace (slugs, codes).
pub fn no_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_whitespace) {
        return Err(error("whitespace", "Cannot contain spaces."));
    }
    Ok(())
}

/// At least one entry, none of them blank.
pub fn non_blank_values(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() || values.iter().any(|v| v.trim().is_empty()) {
        return Err(error(
            "values",
            "At least one value is required, and values cannot be empty.",
        ));
    }
    Ok(())
}

/// Exactly six ASCII digits.
pub fn otp_code(value: &str) -> Result<(), ValidationError> {
    if value.len() != 6 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(error("otp", "OTP must be exactly 6 digits."));
    }
    Ok(())
}

/// Flatten nested validation errors into `(field, message)` pairs, sorted by
/// field so the output is stable.
pub fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort();
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
