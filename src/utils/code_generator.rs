use rand::Rng;

/// Generates a uniformly random 6-digit OTP. Leading zeros are allowed, so
/// the full 000000-999999 space is used.
pub fn generate_six_digit_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..=999_999))
}
