// src/phone.rs
use crate::errors::{AppError, Result};

const COUNTRY_PREFIX: &str = "+256";
const NATIONAL_DIGITS: usize = 9;

/// Normalize a Ugandan mobile number to the canonical `+256XXXXXXXXX` form.
///
/// Accepts an already-canonical `+256...` number, a local `0...` number, a
/// bare `256...` number, or the bare 9-digit national number. Anything that
/// does not end up as `+256` followed by exactly 9 digits is rejected.
pub fn normalize_msisdn(raw: &str) -> Result<String> {
    let raw = raw.trim();

    let formatted = if raw.starts_with(COUNTRY_PREFIX) {
        raw.to_string()
    } else {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if let Some(rest) = digits.strip_prefix('0') {
            format!("{}{}", COUNTRY_PREFIX, rest)
        } else if digits.starts_with("256") {
            format!("+{}", digits)
        } else {
            format!("{}{}", COUNTRY_PREFIX, digits)
        }
    };

    if !is_valid_msisdn(&formatted) {
        return Err(AppError::validation(
            "Invalid mobile number format. Please use format: 07XXXXXXXX or +256XXXXXXXXX",
        ));
    }

    Ok(formatted)
}

fn is_valid_msisdn(msisdn: &str) -> bool {
    match msisdn.strip_prefix(COUNTRY_PREFIX) {
        Some(rest) => rest.len() == NATIONAL_DIGITS && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
