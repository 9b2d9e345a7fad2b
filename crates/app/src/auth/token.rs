//! Admin bearer token for destructive endpoints.

use std::fmt;

use zeroize::Zeroize;

/// The configured admin credential, wiped from memory on drop.
pub struct AdminToken {
    value: String,
}

impl AdminToken {
    #[must_use]
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Compare a presented credential without short-circuiting on the first
    /// mismatched byte.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.value.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(**redacted**)")
    }
}

impl Drop for AdminToken {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_value_only() {
        let token = AdminToken::new("s3cret".to_string());

        assert!(token.matches("s3cret"));
        assert!(!token.matches("s3cre"));
        assert!(!token.matches("s3creT"));
        assert!(!token.matches(""));
    }

    #[test]
    fn debug_never_prints_the_value() {
        let token = AdminToken::new("s3cret".to_string());

        assert_eq!(format!("{token:?}"), "AdminToken(**redacted**)");
    }
}
