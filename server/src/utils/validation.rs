//! Input checks and normalization shared by the services.
//!
//! Normalized values are what gets persisted, so duplicate detection can
//! compare columns directly.

use rust_decimal::Decimal;

use crate::utils::error::{AppError, AppResult};

const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// Trims `value` and rejects it when empty or longer than `max_len` characters.
pub fn required(field: &str, value: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Like [`required`] but maps blank input to `None`.
pub fn optional(field: &str, value: Option<&str>, max_len: usize) -> AppResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required(field, v, max_len).map(Some),
    }
}

/// Returns the trimmed, lowercased address.
pub fn normalize_email(value: &str) -> AppResult<String> {
    let email = value.trim().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::ValidationError(format!(
            "'{}' is not a valid email address",
            value.trim()
        )));
    }
    Ok(email)
}

/// Strips spaces, dashes, dots and parentheses. A leading `+` is kept.
pub fn normalize_phone(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    let (prefix, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => {
                return Err(AppError::ValidationError(format!(
                    "'{}' is not a valid phone number",
                    trimmed
                )))
            }
        }
    }

    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return Err(AppError::ValidationError(format!(
            "Phone number must have between {} and {} digits",
            MIN_PHONE_DIGITS, MAX_PHONE_DIGITS
        )));
    }

    Ok(format!("{}{}", prefix, digits))
}

pub fn positive_amount(field: &str, value: Decimal) -> AppResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(AppError::ValidationError(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Acme  ", 50).unwrap(), "Acme");
        assert!(required("name", "   ", 50).is_err());
        assert!(required("name", "abcdef", 5).is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("message", Some("  "), 10).unwrap(), None);
        assert_eq!(optional("message", None, 10).unwrap(), None);
        assert_eq!(
            optional("message", Some(" hi "), 10).unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(
            normalize_email("  Brand@Example.COM ").unwrap(),
            "brand@example.com"
        );
        assert!(normalize_email("no-at-sign.com").is_err());
        assert!(normalize_email("a@b").is_err());
        assert!(normalize_email("a@@b.com").is_err());
        assert!(normalize_email("a b@c.com").is_err());
    }

    #[test]
    fn test_phone_normalization() {
        assert_eq!(normalize_phone("+971 50-123 4567").unwrap(), "+971501234567");
        assert_eq!(normalize_phone("(050) 123.4567").unwrap(), "0501234567");
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("+971 50 ABC 4567").is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount("amount", Decimal::new(1500, 0)).is_ok());
        assert!(positive_amount("amount", Decimal::ZERO).is_err());
        assert!(positive_amount("amount", Decimal::new(-1, 0)).is_err());
    }
}
