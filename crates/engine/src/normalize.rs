//! Canonical forms for identifying fields.
//!
//! Both normalizers return `None` when the cell carries no usable value, so
//! callers never see an empty key.

/// Trim and lower-case an email. No syntax validation.
pub fn normalize_email(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Keep only the decimal digits of a phone number.
///
/// Length is not checked: `1-555-123-4567` and `555-123-4567` produce
/// different keys.
pub fn normalize_phone(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}
