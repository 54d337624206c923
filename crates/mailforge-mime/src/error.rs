//! Error types for MIME construction.

use std::string::FromUtf8Error;

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or decoding MIME content.
///
/// Only [`Error::MalformedContentType`] arises while building a message;
/// the rest come from the `encoding::decode_*` functions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A Content-Type string lacked a `type/subtype` pair.
    #[error("Malformed content type {0:?}")]
    MalformedContentType(String),

    /// A quoted-printable escape was truncated or not hexadecimal.
    #[error("Bad quoted-printable escape: {0}")]
    QuotedPrintable(String),

    /// An RFC 2047 encoded word was malformed.
    #[error("Bad encoded word: {0}")]
    EncodedWord(String),

    /// Base64 payload could not be decoded.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes were not UTF-8.
    #[error("UTF-8 decode error: {0}")]
    Utf8(#[from] FromUtf8Error),
}
