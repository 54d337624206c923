//! Outgoing account lookup.

use serde::{Deserialize, Serialize};

/// The account mail is sent from when the caller gives no sender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingAccount {
    /// Sender address.
    pub email_id: String,
    /// Signature HTML.
    #[serde(default)]
    pub signature: Option<String>,
    /// Whether the signature is appended to footers.
    #[serde(default)]
    pub add_signature: bool,
    /// Account-specific footer HTML; replaces the registered defaults.
    #[serde(default)]
    pub footer: Option<String>,
}

impl OutgoingAccount {
    /// Creates an account with no signature or footer.
    #[must_use]
    pub fn new(email_id: impl Into<String>) -> Self {
        Self {
            email_id: email_id.into(),
            ..Self::default()
        }
    }

    /// Sets a signature and enables appending it.
    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self.add_signature = true;
        self
    }

    /// Sets the account footer.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Returns the signature if it should be appended.
    #[must_use]
    pub fn active_signature(&self) -> Option<&str> {
        self.signature
            .as_deref()
            .filter(|signature| self.add_signature && !signature.is_empty())
    }

    /// Returns the footer if one is set.
    #[must_use]
    pub fn active_footer(&self) -> Option<&str> {
        self.footer.as_deref().filter(|footer| !footer.is_empty())
    }
}

/// Resolves the default outgoing account.
pub trait AccountResolver: Send + Sync {
    /// Returns the default account, if one is configured.
    fn default_account(&self) -> Option<OutgoingAccount>;
}

/// Resolver with no configured account.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccount;

impl AccountResolver for NoAccount {
    fn default_account(&self) -> Option<OutgoingAccount> {
        None
    }
}

/// Resolver that always returns the same account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAccount(pub OutgoingAccount);

impl AccountResolver for StaticAccount {
    fn default_account(&self) -> Option<OutgoingAccount> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_requires_flag() {
        let mut account = OutgoingAccount::new("a@x.com").with_signature("Thanks");
        assert_eq!(account.active_signature(), Some("Thanks"));

        account.add_signature = false;
        assert_eq!(account.active_signature(), None);
    }

    #[test]
    fn test_empty_values_are_inactive() {
        let account = OutgoingAccount::new("a@x.com")
            .with_signature("")
            .with_footer("");
        assert_eq!(account.active_signature(), None);
        assert_eq!(account.active_footer(), None);
    }

    #[test]
    fn test_deserialize_minimal() {
        let account: OutgoingAccount =
            serde_json::from_str(r#"{"email_id": "noreply@example.com"}"#).unwrap();
        assert_eq!(account, OutgoingAccount::new("noreply@example.com"));
    }
}
