use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const CODE_LENGTH: usize = 6;
const CODE_SPACE: u128 = 1_000_000;

/// A freshly issued one-time code and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct OneTimeCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn issue(ttl: Duration) -> Self {
        Self {
            code: generate_code(),
            expires_at: Utc::now() + ttl,
        }
    }
}

/// Six zero-padded decimal digits drawn from the OS-seeded v4 UUID generator.
pub fn generate_code() -> String {
    let n = Uuid::new_v4().as_u128() % CODE_SPACE;
    format!("{:0width$}", n, width = CODE_LENGTH)
}

pub fn codes_match(expected: &str, submitted: &str) -> bool {
    constant_time_eq(expected, submitted.trim())
}

/// Compares without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_match() {
        assert!(codes_match("004211", "004211"));
        assert!(codes_match("004211", " 004211 "));
        assert!(!codes_match("004211", "4211"));
        assert!(!codes_match("004211", "004212"));
    }

    #[test]
    fn test_issue_sets_future_expiry() {
        let otp = OneTimeCode::issue(Duration::seconds(600));
        assert!(otp.expires_at > Utc::now());
    }
}
