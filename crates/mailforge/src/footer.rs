//! Footer composition.

use crate::collaborators::{FooterRegistry, OutgoingAccount};

/// Marker replaced with an unsubscribe link by the sending layer.
pub const UNSUBSCRIBE_PLACEHOLDER: &str = "<!--unsubscribe link here-->";

/// Builds the footer appended to every rendered body.
///
/// Order: the explicit footer, the account signature (when enabled), the
/// account footer or else every registered default fragment, and finally
/// [`UNSUBSCRIBE_PLACEHOLDER`].
#[must_use]
pub fn compose_footer(
    footer: Option<&str>,
    account: Option<&OutgoingAccount>,
    registry: &dyn FooterRegistry,
) -> String {
    let mut composed = footer.unwrap_or_default().to_string();

    if let Some(signature) = account.and_then(OutgoingAccount::active_signature) {
        composed.push_str(signature);
    }

    match account.and_then(OutgoingAccount::active_footer) {
        Some(account_footer) => composed.push_str(account_footer),
        None => {
            for fragment in registry.default_footers() {
                composed.push_str(&fragment);
            }
        }
    }

    composed.push_str(UNSUBSCRIBE_PLACEHOLDER);
    composed
}
