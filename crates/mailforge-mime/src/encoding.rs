//! MIME encoding and decoding utilities.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 header encoding.
//! The `decode_*` functions are the inverse of the encoders. Message
//! rendering only encodes; the decoders are public for verifying rendered
//! output.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Maximum line length for encoded bodies (RFC 2045).
const MAX_LINE_LENGTH: usize = 76;

/// Maximum number of raw bytes carried by a single RFC 2047 encoded word.
///
/// 45 bytes become 60 Base64 characters, which keeps each word plus the
/// `=?utf-8?B?...?=` framing under 75 characters.
const MAX_ENCODED_WORD_BYTES: usize = 45;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 wrapped at 76 columns with CRLF line breaks.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = encode_base64(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    // Base64 output is pure ASCII, so byte chunks are valid str slices.
    for (index, line) in encoded.as_bytes().chunks(MAX_LINE_LENGTH).enumerate() {
        if index > 0 {
            result.push_str("\r\n");
        }
        result.push_str(&String::from_utf8_lossy(line));
    }

    result
}

/// Decodes Base64 data, ignoring embedded whitespace.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Line breaks in the input become CRLF hard breaks. Bytes that are not
/// printable ASCII, `=`, and whitespace at the end of a line are escaped.
/// Lines longer than 76 characters get soft line breaks.
#[must_use]
pub fn encode_quoted_printable(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut result = String::with_capacity(normalized.len());
    let mut lines = normalized.split('\n').peekable();

    while let Some(line) = lines.next() {
        encode_quoted_printable_line(line, &mut result);
        if lines.peek().is_some() {
            result.push_str("\r\n");
        }
    }

    result
}

fn encode_quoted_printable_line(line: &str, out: &mut String) {
    let bytes = line.as_bytes();
    let mut line_length = 0;

    for (index, &byte) in bytes.iter().enumerate() {
        let at_end = index + 1 == bytes.len();
        let literal = match byte {
            b'!'..=b'<' | b'>'..=b'~' => true,
            b' ' | b'\t' => !at_end,
            _ => false,
        };
        let width = if literal { 1 } else { 3 };

        // Leave room for the trailing '=' of a soft break
        if line_length + width > MAX_LINE_LENGTH - 1 {
            out.push_str("=\r\n");
            line_length = 0;
        }

        if literal {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "={byte:02X}");
        }
        line_length += width;
    }
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences or the
/// decoded bytes are not UTF-8.
pub fn decode_quoted_printable(text: &str) -> Result<String> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] != b'=' {
            result.push(bytes[index]);
            index += 1;
            continue;
        }

        match bytes.get(index + 1..) {
            Some([b'\r', b'\n', ..]) => index += 3,
            Some([b'\n', ..]) => index += 2,
            Some([high, low, ..]) => {
                let hex = [*high, *low];
                let byte = std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or_else(|| {
                        Error::QuotedPrintable(format!("={}", String::from_utf8_lossy(&hex)))
                    })?;
                result.push(byte);
                index += 3;
            }
            _ => {
                return Err(Error::QuotedPrintable("truncated escape".to_string()));
            }
        }
    }

    String::from_utf8(result).map_err(Into::into)
}

/// Returns true if a header value can be sent without RFC 2047 encoding.
fn is_header_safe(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) && !text.contains("=?")
}

/// Encodes a header value using RFC 2047 encoding.
///
/// Format: `=?charset?B?encoded-text?=`. Values that are plain printable
/// ASCII are returned unchanged. Long values are split into several
/// encoded words joined by folding whitespace, never splitting a
/// character across words.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if is_header_safe(text) {
        return text.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();

    for c in text.chars() {
        if chunk.len() + c.len_utf8() > MAX_ENCODED_WORD_BYTES {
            words.push(format!("=?{charset}?B?{}?=", encode_base64(chunk.as_bytes())));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(format!("=?{charset}?B?{}?=", encode_base64(chunk.as_bytes())));
    }

    words.join("\r\n ")
}

/// Encodes the display name of a mailbox (`Name <addr@host>`) with
/// RFC 2047, leaving the address itself untouched.
///
/// Bare addresses are returned unchanged.
#[must_use]
pub fn encode_mailbox(mailbox: &str) -> String {
    let mailbox = mailbox.trim();
    let Some(open) = mailbox.rfind('<') else {
        return mailbox.to_string();
    };
    if !mailbox.ends_with('>') {
        return mailbox.to_string();
    }

    let name = mailbox[..open].trim().trim_matches('"');
    let address = &mailbox[open..];
    if name.is_empty() || is_header_safe(name) {
        return mailbox.to_string();
    }

    format!("{} {address}", encode_rfc2047(name, "utf-8"))
}

/// Decodes an RFC 2047 encoded header value.
///
/// Handles several encoded words in one value; whitespace between two
/// adjacent encoded words is dropped, as the RFC requires.
///
/// # Errors
///
/// Returns an error if an encoded word is malformed.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut previous_encoded = false;

    for (index, token) in text.split_whitespace().enumerate() {
        let encoded = token.len() > 4 && token.starts_with("=?") && token.ends_with("?=");
        if index > 0 && !(encoded && previous_encoded) {
            result.push(' ');
        }

        if encoded {
            result.push_str(&decode_word(&token[2..token.len() - 2])?);
        } else {
            result.push_str(token);
        }
        previous_encoded = encoded;
    }

    Ok(result)
}

fn decode_word(inner: &str) -> Result<String> {
    let parts: Vec<&str> = inner.split('?').collect();
    if parts.len() != 3 {
        return Err(Error::EncodedWord(format!("=?{inner}?=")));
    }

    let encoding = parts[1].to_uppercase();
    let encoded_text = parts[2];

    match encoding.as_str() {
        "B" => {
            let decoded = decode_base64(encoded_text)?;
            String::from_utf8(decoded).map_err(Into::into)
        }
        "Q" => decode_quoted_printable(&encoded_text.replace('_', " ")),
        _ => Err(Error::EncodedWord(format!("unknown encoding {encoding:?}"))),
    }
}
