//! Address syntax validation.

/// Checks address syntax.
pub trait AddressValidator: Send + Sync {
    /// Returns true if `address` is acceptable as a mailbox.
    fn is_valid(&self, address: &str) -> bool;
}

/// Basic structural check.
///
/// Accepts `user@domain` or `Display Name <user@domain>`. Requires exactly
/// one `@`, non-empty local and domain parts, no empty domain labels, and
/// no whitespace or list separators inside the address.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicAddressValidator;

impl BasicAddressValidator {
    /// Extracts the bare address from an optional `Name <addr>` form.
    #[must_use]
    pub fn bare_address(mailbox: &str) -> &str {
        let mailbox = mailbox.trim();
        match (mailbox.rfind('<'), mailbox.strip_suffix('>')) {
            (Some(open), Some(inner)) => inner[open + 1..].trim(),
            _ => mailbox,
        }
    }
}

impl AddressValidator for BasicAddressValidator {
    fn is_valid(&self, address: &str) -> bool {
        let address = Self::bare_address(address);
        if address.is_empty() {
            return false;
        }

        let Some((local, domain)) = address.split_once('@') else {
            return false;
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }

        if address
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | ',' | ';'))
        {
            return false;
        }

        !domain.starts_with('.') && !domain.ends_with('.') && !domain.contains("..")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address() {
        assert!(BasicAddressValidator.is_valid("user@example.com"));
        assert!(BasicAddressValidator.is_valid("  user@localhost  "));
    }

    #[test]
    fn test_valid_named_mailbox() {
        assert!(BasicAddressValidator.is_valid("John Doe <john@example.com>"));
        assert!(BasicAddressValidator.is_valid("\"Doe, John\" <john@example.com>"));
    }

    #[test]
    fn test_invalid_address_no_at() {
        assert!(!BasicAddressValidator.is_valid("userexample.com"));
    }

    #[test]
    fn test_invalid_address_empty() {
        assert!(!BasicAddressValidator.is_valid(""));
        assert!(!BasicAddressValidator.is_valid("Name <>"));
    }

    #[test]
    fn test_invalid_address_empty_parts() {
        assert!(!BasicAddressValidator.is_valid("@example.com"));
        assert!(!BasicAddressValidator.is_valid("user@"));
    }

    #[test]
    fn test_invalid_address_structure() {
        assert!(!BasicAddressValidator.is_valid("a@b@example.com"));
        assert!(!BasicAddressValidator.is_valid("user name@example.com"));
        assert!(!BasicAddressValidator.is_valid("user@.example.com"));
        assert!(!BasicAddressValidator.is_valid("user@example..com"));
    }

    #[test]
    fn test_bare_address() {
        assert_eq!(
            BasicAddressValidator::bare_address("Jane <jane@example.com>"),
            "jane@example.com"
        );
        assert_eq!(
            BasicAddressValidator::bare_address("jane@example.com"),
            "jane@example.com"
        );
    }
}
