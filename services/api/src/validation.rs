//! Input validation utilities

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::models::{CategoryInput, UserInput};

pub const USERNAME_MAX_CHARS: usize = 27;
pub const PASSWORD_MIN_CHARS: usize = 8;
const EMAIL_MAX_CHARS: usize = 254;
const PASSWORD_MAX_CHARS: usize = 128;
const NAME_MAX_CHARS: usize = 255;

/// Wire format of `dueDate` when a ToDo is created
pub const DUE_DATE_INPUT_FORMAT: &str = "%d/%m/%Y";
/// Format in which due dates are stored and returned
pub const DUE_DATE_ISO_FORMAT: &str = "%Y-%m-%d";

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(format!(
            "Username must be at most {} characters long",
            USERNAME_MAX_CHARS
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(format!(
            "Email must be at most {} characters long",
            EMAIL_MAX_CHARS
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let len = password.chars().count();

    if len < PASSWORD_MIN_CHARS {
        return Err(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_CHARS
        ));
    }

    if len > PASSWORD_MAX_CHARS {
        return Err(format!(
            "Password must be at most {} characters long",
            PASSWORD_MAX_CHARS
        ));
    }

    Ok(())
}

/// Validate every field of a user payload, reporting the first failure
pub fn validate_user(input: &UserInput) -> Result<(), String> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_password(&input.password)
}

/// Validate category name
pub fn validate_category_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Category name is required".to_string());
    }

    if name.chars().count() > NAME_MAX_CHARS {
        return Err(format!(
            "Category name must be at most {} characters long",
            NAME_MAX_CHARS
        ));
    }

    Ok(())
}

pub fn validate_category(input: &CategoryInput) -> Result<(), String> {
    validate_category_name(&input.name)
}

/// Validate ToDo title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.chars().count() > NAME_MAX_CHARS {
        return Err(format!(
            "Title must be at most {} characters long",
            NAME_MAX_CHARS
        ));
    }

    Ok(())
}

/// Parse a `dd/MM/yyyy` due date
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_INPUT_FORMAT)
        .map_err(|_| format!("Invalid due date '{}': expected dd/MM/yyyy", raw))
}

/// Parse a due date given either as `dd/MM/yyyy` or as ISO `yyyy-MM-dd`
pub fn parse_due_date_lenient(raw: &str) -> Result<NaiveDate, String> {
    parse_due_date(raw)
        .or_else(|_| NaiveDate::parse_from_str(raw.trim(), DUE_DATE_ISO_FORMAT))
        .map_err(|_| {
            format!(
                "Invalid due date '{}': expected dd/MM/yyyy or yyyy-MM-dd",
                raw
            )
        })
}
