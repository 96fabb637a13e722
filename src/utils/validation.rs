use crate::error::{AppError, AppResult};
use regex::Regex;

/// Basic email shape check: something@something.something, no whitespace.
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    if !email_regex.is_match(email) {
        return Err(AppError::ValidationError(
            "Please enter a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// OTPs are always exactly 6 digits.
pub fn validate_otp_format(otp: &str) -> AppResult<()> {
    if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::ValidationError(
            "Please enter a valid 6-digit OTP".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("user.name@example.co.in").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@domain").is_err());
        assert!(validate_email("has space@b.com").is_err());
        assert!(validate_email("@b.com").is_err());
    }

    #[test]
    fn test_validate_otp_format() {
        assert!(validate_otp_format("123456").is_ok());
        assert!(validate_otp_format("000000").is_ok());
        assert!(validate_otp_format("12345").is_err());
        assert!(validate_otp_format("1234567").is_err());
        assert!(validate_otp_format("12345a").is_err());
    }
}
