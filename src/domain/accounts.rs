//! Account invariants shared by sign-in and provisioning.

use crate::domain::error::DomainError;

const MAX_EMAIL_LEN: usize = 254;
const MAX_NAME_LEN: usize = 120;

/// Canonical form used for storage and lookups: trimmed and lowercased.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(DomainError::invalid("email", "must not be empty"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(DomainError::invalid("email", "is too long"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::invalid("email", "must contain `@`"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(DomainError::invalid("email", "is malformed"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(DomainError::invalid("email", "must not contain whitespace"));
    }

    Ok(email)
}

pub fn normalize_display_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::invalid("name", "must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::invalid("name", "is too long"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "ada", "@example.com", "ada@", "a@b@c", "ad a@example.com"] {
            assert!(normalize_email(raw).is_err(), "accepted `{raw}`");
        }
    }

    #[test]
    fn errors_name_the_field() {
        assert_eq!(
            normalize_email("ada").unwrap_err(),
            DomainError::invalid("email", "must contain `@`")
        );
        assert_eq!(normalize_display_name("").unwrap_err().field(), Some("name"));
    }

    #[test]
    fn display_name_must_have_content() {
        assert!(normalize_display_name("   ").is_err());
        assert_eq!(normalize_display_name(" Ada ").unwrap(), "Ada");
    }
}
