//! Field rules shared by every payload that carries account data.
//!
//! Each function returns the normalized value or the message shown to the
//! client for that field.

use email_address::EmailAddress;

pub const USERNAME_MAX: usize = 60;
pub const NAME_MAX: usize = 60;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 60;

const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub fn normalize_username(raw: &str) -> Result<String, String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err("Username Is Required".to_string());
    }
    if username.chars().count() > USERNAME_MAX {
        return Err("Username Must Not Exceed 60 Characters".to_string());
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Username Must Contain Only Alphanumeric Characters With No Spaces".to_string());
    }
    Ok(username.to_lowercase())
}

/// `label` is "First" or "Last".
pub fn normalize_person_name(label: &str, raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(format!("{label} Name Is Required"));
    }
    if name.chars().count() > NAME_MAX {
        return Err(format!("{label} Name Must Not Exceed 60 Characters"));
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!(
            "{label} Name Must Contain Only Letters With No Spaces"
        ));
    }
    Ok(title_case(name))
}

pub fn normalize_email(raw: &str) -> Result<String, String> {
    let email = raw.trim();
    if email.is_empty() {
        return Err("Email Is Required".to_string());
    }
    if !EmailAddress::is_valid(email) {
        return Err("Enter A Valid Email Address".to_string());
    }
    Ok(email.to_lowercase())
}

/// Username or email used to look an account up.
pub fn normalize_identifier(raw: &str) -> Result<String, String> {
    let identifier = raw.trim();
    if identifier.is_empty() {
        return Err("Identifier Is Required".to_string());
    }
    Ok(identifier.to_lowercase())
}

pub fn validate_password(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err("Password Is Required".to_string());
    }
    let length = raw.chars().count();
    if length < PASSWORD_MIN {
        return Err("Password Must Contain At Least 8 Characters".to_string());
    }
    if length > PASSWORD_MAX {
        return Err("Password Must Not Exceed 60 Characters".to_string());
    }

    let allowed = raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let has_lower = raw.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = raw.chars().any(|c| c.is_ascii_digit());
    let has_special = raw.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if !(allowed && has_lower && has_upper && has_digit && has_special) {
        return Err("Password Must Contain At Least One Uppercase Letter, One Lowercase Letter, One Digit, and One Special Character".to_string());
    }
    Ok(raw.to_string())
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
