use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Emails are the identity key: compare and store them trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// Checks a registration before anything touches the store.
/// Every problem is reported, not just the first.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    number: &str,
) -> Result<(), AppError> {
    let mut problems = Vec::new();

    for (label, value) in [
        ("name", name),
        ("email", email),
        ("password", password),
        ("number", number),
    ] {
        if value.trim().is_empty() {
            problems.push(format!("{label} is required"));
        }
    }

    if !email.trim().is_empty() && !is_valid_email(email) {
        problems.push("email must look like name@example.com".to_string());
    }

    if !password.trim().is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join("; ")))
    }
}
