//! Field rules for [`SendRequest`]. Every rule runs; violations are collected
//! in rule order rather than stopping at the first one.

use crate::error::ApiError;
use crate::request::SendRequest;

const MAX_NAME_LEN: usize = 50;
const MAX_SUBJECT_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

pub fn validate(request: &SendRequest) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    check_email(
        &mut violations,
        "senderEmail",
        &request.sender_email,
        "Sender's email is required.",
        "Sender's email is not a valid email address.",
    );
    check_bounded(
        &mut violations,
        "senderName",
        &request.sender_name,
        MAX_NAME_LEN,
        "Sender's name is required.",
        "Sender's name must be less than 50 characters.",
    );
    check_email(
        &mut violations,
        "recipientEmail",
        &request.recipient_email,
        "Recipient's email is required.",
        "Recipient's email is not a valid email address.",
    );
    check_bounded(
        &mut violations,
        "recipientName",
        &request.recipient_name,
        MAX_NAME_LEN,
        "Recipient's name is required.",
        "Recipient's name must be less than 50 characters.",
    );
    check_bounded(
        &mut violations,
        "subject",
        &request.subject,
        MAX_SUBJECT_LEN,
        "Email subject is required.",
        "Subject must be less than 100 characters.",
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Runs [`validate`] and folds any violations into a single Validation error.
pub fn ensure_valid(request: &SendRequest) -> Result<(), ApiError> {
    validate(request).map_err(|violations| {
        let joined = violations
            .iter()
            .map(|v| v.message)
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::Validation {
            message: format!("Validation failed: {joined}"),
            violations,
        }
    })
}

/// One `@`, neither first nor last, and no whitespace anywhere.
pub fn is_valid_email(value: &str) -> bool {
    // Stricter than a bare `@` check: addresses like `john doe@example.com`
    // are rejected on purpose.
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match (value.find('@'), value.rfind('@')) {
        (Some(first), Some(last)) => first == last && first > 0 && first < value.len() - 1,
        _ => false,
    }
}

/// Whitespace-only counts as missing.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_email(
    violations: &mut Vec<Violation>,
    field: &'static str,
    value: &str,
    required: &'static str,
    malformed: &'static str,
) {
    if is_blank(value) {
        violations.push(Violation {
            field,
            message: required,
        });
    } else if !is_valid_email(value) {
        violations.push(Violation {
            field,
            message: malformed,
        });
    }
}

fn check_bounded(
    violations: &mut Vec<Violation>,
    field: &'static str,
    value: &str,
    max: usize,
    required: &'static str,
    too_long: &'static str,
) {
    if is_blank(value) {
        violations.push(Violation {
            field,
            message: required,
        });
    } else if value.chars().count() > max {
        violations.push(Violation {
            field,
            message: too_long,
        });
    }
}
