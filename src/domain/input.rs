//! Validation for the typed request payloads accepted by the HTTP surface.
//!
//! URLs are validated by the `url` crate at deserialization time; email
//! addresses get the shape check here. The QR pipeline itself treats every
//! payload as opaque text.

use super::error::DomainError;

/// A structurally plausible email address.
///
/// This checks the shape (`local@domain` with a dotted domain), not
/// deliverability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(DomainError::validation(format!(
                "`{value}` is not a valid email address"
            )));
        };

        let domain_ok = domain.split('.').count() >= 2
            && domain
                .split('.')
                .all(|label| !label.is_empty() && label.chars().all(is_domain_char));

        if local.is_empty() || local.contains(char::is_whitespace) || !domain_ok {
            return Err(DomainError::validation(format!(
                "`{value}` is not a valid email address"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}
