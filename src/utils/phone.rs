use crate::error::{AppError, AppResult};

/// Validates the raw mobile number a client submits: exactly 10 digits,
/// no country prefix.
pub fn validate_mobile_number(phone: &str) -> AppResult<()> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::ValidationError(
            "Please enter a valid 10-digit mobile number".to_string(),
        ));
    }

    Ok(())
}

/// Normalizes a phone number to digits only with the country calling code
/// prefixed exactly once. A 10-digit local number always gets the prefix,
/// even when it happens to start with the same digits as the country code.
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() > 10 && digits.starts_with(country_code) {
        digits
    } else {
        format!("{country_code}{digits}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mobile_number() {
        assert!(validate_mobile_number("9876543210").is_ok());
        assert!(validate_mobile_number("987654321").is_err());
        assert!(validate_mobile_number("98765432100").is_err());
        assert!(validate_mobile_number("987654321a").is_err());
        assert!(validate_mobile_number("").is_err());
    }

    #[test]
    fn test_normalize_phone_prefixes_country_code() {
        assert_eq!(normalize_phone("9876543210", "91"), "919876543210");
        // Local numbers starting with the country code digits still get prefixed.
        assert_eq!(normalize_phone("9123456789", "91"), "919123456789");
    }

    #[test]
    fn test_normalize_phone_is_idempotent() {
        let once = normalize_phone("9876543210", "91");
        assert_eq!(normalize_phone(&once, "91"), once);
    }

    #[test]
    fn test_normalize_phone_strips_formatting() {
        assert_eq!(normalize_phone("98765 43210", "91"), "919876543210");
        assert_eq!(normalize_phone("+91 98765-43210", "91"), "919876543210");
    }
}
