//! # mailforge-mime
//!
//! MIME message model and wire-format generation for outgoing email.
//!
//! ## Features
//!
//! - **Typed MIME tree**: leaf parts tagged by kind (text, HTML, binary,
//!   image, audio) inside mixed/alternative containers
//! - **Encoding**: Base64, Quoted-Printable, RFC 2047 header encoding
//! - **Decoding**: the inverse of each encoder, public so callers and tests
//!   can check what a rendered message carries; composition never decodes
//! - **Content types**: parsing, rendering and guessing from filenames
//! - **Ordered headers**: case-insensitive lookup, stable rendering
//!
//! ## Quick Start
//!
//! ```
//! use mailforge_mime::{Message, Multipart, MultipartKind, Part, PartBody};
//!
//! let mut alternative = Multipart::new(MultipartKind::Alternative, "=_alt");
//! alternative.push_part(Part::new(PartBody::Html("<p>Hello</p>".to_string())));
//!
//! let mut root = Multipart::new(MultipartKind::Mixed, "=_mixed");
//! root.push_multipart(alternative);
//!
//! let mut message = Message::new(root);
//! message.headers.set("Subject", "Greetings");
//!
//! let wire = message.to_string();
//! assert!(wire.contains("Subject: Greetings\r\n"));
//! ```
//!
//! ### Encoding/Decoding
//!
//! ```
//! use mailforge_mime::encoding::{
//!     decode_base64, decode_quoted_printable, decode_rfc2047, encode_base64,
//!     encode_quoted_printable, encode_rfc2047,
//! };
//!
//! let encoded = encode_base64(b"Hello, World!");
//! assert_eq!(decode_base64(&encoded).unwrap(), b"Hello, World!");
//!
//! let subject = encode_rfc2047("Héllo", "utf-8");
//! assert!(subject.starts_with("=?utf-8?B?"));
//! assert_eq!(decode_rfc2047(&subject).unwrap(), "Héllo");
//!
//! let body = encode_quoted_printable("Grüße");
//! assert_eq!(decode_quoted_printable(&body).unwrap(), "Grüße");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::{ContentType, OCTET_STREAM};
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Entity, Message, Multipart, MultipartKind, Part, PartBody, TransferEncoding};
