//! Error types for message composition.

use crate::collaborators::BoxError;

/// Errors that can occur while composing a message.
///
/// Collaborator failures keep the collaborator's own error as the source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sender, reply-to, recipient or cc address failed validation.
    #[error("{0} is not a valid email address")]
    InvalidAddress(String),

    /// No recipients remained after normalization.
    #[error("No recipients specified")]
    NoRecipients,

    /// Sender was empty and no default outgoing account is configured.
    #[error("No sender specified and no default outgoing account configured")]
    MissingSender,

    /// Template rendering failed.
    #[error("Template rendering failed: {0}")]
    Template(#[source] BoxError),

    /// PDF rendering failed.
    #[error("PDF rendering failed: {0}")]
    PdfRender(#[source] BoxError),

    /// File store lookup failed.
    #[error("File store lookup failed: {0}")]
    FileStore(#[source] BoxError),

    /// An optional collaborator was needed but not configured.
    #[error("No {0} configured")]
    MissingCollaborator(&'static str),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// MIME construction error.
    #[error("MIME error: {0}")]
    Mime(#[from] mailforge_mime::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// HTML-to-text conversion failure.
///
/// Never surfaced to callers of the builder: a failed conversion only
/// drops the automatic plain-text alternative.
#[derive(Debug, thiserror::Error)]
#[error("HTML to text conversion failed: {0}")]
pub struct TextConversionError(#[source] pub BoxError);
