use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, WaitlistError};

/// Longest address accepted (RFC 5321 path limit minus the angle brackets).
pub const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$").unwrap()
});

/// Validate a submitted address and return it trimmed.
pub fn validate_email(raw: &str) -> Result<String> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(WaitlistError::validation("email", "Email is required"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(WaitlistError::validation("email", "Email is too long"));
    }
    // The regex crate has no lookahead, so the dot rules live here.
    let local = email.split('@').next().unwrap_or_default();
    if local.starts_with('.') || email.contains("..") || !EMAIL_RE.is_match(email) {
        return Err(WaitlistError::validation("email", "Invalid email address"));
    }
    Ok(email.to_string())
}

/// Domain half of an address, for logs that must not carry the full email.
pub fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid(s: &str) -> bool {
        validate_email(s).is_ok()
    }

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid("user@example.com"));
        assert!(is_valid("first.last+tag@sub.example.co.uk"));
        assert!(is_valid("O'Brien@Example.IE"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_email("  a@x.com \n").unwrap(), "a@x.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "not-an-email",
            "",
            "   ",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            ".user@example.com",
            "user.@example.com",
            "us..er@example.com",
            "user@exa..mple.com",
            "user name@example.com",
            "user@-example.com",
        ] {
            assert!(!is_valid(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rejects_overlong_addresses() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            validate_email(&email),
            Err(WaitlistError::Validation { ref message, .. }) if message == "Email is too long"
        ));
    }

    #[test]
    fn validation_error_names_the_field() {
        match validate_email("nope") {
            Err(WaitlistError::Validation { field, .. }) => assert_eq!(field, "email"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn domain_for_logging() {
        assert_eq!(email_domain("a@b.example"), "b.example");
        assert_eq!(email_domain("nope"), "");
    }
}
