//! MIME message tree and wire-format rendering.
//!
//! A [`Message`] is a root multipart container plus top-level headers.
//! Containers hold [`Entity`] values, which are either leaf [`Part`]s or
//! nested [`Multipart`] containers. Every leaf variant decides its own
//! transfer encoding.

use crate::content_type::ContentType;
use crate::encoding::{encode_base64_wrapped, encode_quoted_printable};
use crate::header::Headers;
use std::fmt;

/// Transfer encoding applied to a leaf part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
        }
    }
}

/// Payload of a leaf part, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    /// UTF-8 text with a `text/*` subtype.
    Text {
        /// Subtype, e.g. `plain` or `csv`.
        subtype: String,
        /// Text content.
        content: String,
    },
    /// UTF-8 HTML (`text/html`).
    Html(String),
    /// Arbitrary bytes with a full content type.
    Binary {
        /// Declared content type.
        content_type: ContentType,
        /// Raw bytes.
        data: Vec<u8>,
    },
    /// Image bytes (`image/*`).
    Image {
        /// Subtype, e.g. `png`.
        subtype: String,
        /// Raw bytes.
        data: Vec<u8>,
    },
    /// Audio bytes (`audio/*`).
    Audio {
        /// Subtype, e.g. `mpeg`.
        subtype: String,
        /// Raw bytes.
        data: Vec<u8>,
    },
}

impl PartBody {
    /// Returns the content type this payload is rendered with.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Text { subtype, .. } => ContentType::text(subtype.clone()),
            Self::Html(_) => ContentType::text_html(),
            Self::Binary { content_type, .. } => content_type.clone(),
            Self::Image { subtype, .. } => ContentType::new("image", subtype.clone()),
            Self::Audio { subtype, .. } => ContentType::new("audio", subtype.clone()),
        }
    }

    /// Returns the transfer encoding for this payload.
    ///
    /// Text and HTML use quoted-printable; everything else is base64.
    #[must_use]
    pub const fn transfer_encoding(&self) -> TransferEncoding {
        match self {
            Self::Text { .. } | Self::Html(_) => TransferEncoding::QuotedPrintable,
            Self::Binary { .. } | Self::Image { .. } | Self::Audio { .. } => {
                TransferEncoding::Base64
            }
        }
    }

    /// Returns the payload encoded for the wire.
    #[must_use]
    pub fn encoded(&self) -> String {
        match self {
            Self::Text { content, .. } | Self::Html(content) => encode_quoted_printable(content),
            Self::Binary { data, .. } | Self::Image { data, .. } | Self::Audio { data, .. } => {
                encode_base64_wrapped(data)
            }
        }
    }

    /// Returns the size of the unencoded payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text { content, .. } | Self::Html(content) => content.len(),
            Self::Binary { data, .. } | Self::Image { data, .. } | Self::Audio { data, .. } => {
                data.len()
            }
        }
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Leaf MIME part: a payload plus an optional attachment filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Payload.
    pub body: PartBody,
    /// Filename for `Content-Disposition: attachment`, if any.
    pub filename: Option<String>,
}

impl Part {
    /// Creates an inline part.
    #[must_use]
    pub const fn new(body: PartBody) -> Self {
        Self {
            body,
            filename: None,
        }
    }

    /// Marks the part as an attachment with the given filename.
    ///
    /// The filename is written verbatim inside double quotes.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Builds the part headers.
    #[must_use]
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.add("Content-Type", self.body.content_type().to_string());
        headers.add(
            "Content-Transfer-Encoding",
            self.body.transfer_encoding().to_string(),
        );
        if let Some(filename) = &self.filename {
            headers.add(
                "Content-Disposition",
                format!("attachment; filename=\"{filename}\""),
            );
        }
        headers
    }
}

/// Multipart container subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultipartKind {
    /// `multipart/mixed`: independent parts, e.g. body plus attachments.
    Mixed,
    /// `multipart/alternative`: equivalent renderings of one body.
    Alternative,
}

/// Multipart container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multipart {
    /// Container subtype.
    pub kind: MultipartKind,
    /// Boundary delimiter (without leading dashes).
    pub boundary: String,
    /// Child entities in order.
    pub entities: Vec<Entity>,
}

impl Multipart {
    /// Creates an empty container.
    #[must_use]
    pub fn new(kind: MultipartKind, boundary: impl Into<String>) -> Self {
        Self {
            kind,
            boundary: boundary.into(),
            entities: Vec::new(),
        }
    }

    /// Returns the container content type including the boundary.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match self.kind {
            MultipartKind::Mixed => ContentType::multipart_mixed(self.boundary.clone()),
            MultipartKind::Alternative => {
                ContentType::multipart_alternative(self.boundary.clone())
            }
        }
    }

    /// Appends a leaf part.
    pub fn push_part(&mut self, part: Part) {
        self.entities.push(Entity::Single(part));
    }

    /// Appends a nested container.
    pub fn push_multipart(&mut self, multipart: Self) {
        self.entities.push(Entity::Multipart(multipart));
    }

    /// Returns the first nested container of the given kind.
    #[must_use]
    pub fn find(&self, kind: MultipartKind) -> Option<&Self> {
        self.entities.iter().find_map(|entity| match entity {
            Entity::Multipart(inner) if inner.kind == kind => Some(inner),
            _ => None,
        })
    }

    /// Returns the first nested container of the given kind, mutably.
    pub fn find_mut(&mut self, kind: MultipartKind) -> Option<&mut Self> {
        self.entities.iter_mut().find_map(|entity| match entity {
            Entity::Multipart(inner) if inner.kind == kind => Some(inner),
            _ => None,
        })
    }

    /// Returns the leaf parts directly inside this container.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Single(part) => Some(part),
            Entity::Multipart(_) => None,
        })
    }

    fn write_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let boundary = &self.boundary;

        for entity in &self.entities {
            write!(f, "--{boundary}\r\n")?;
            entity.write(f)?;
            write!(f, "\r\n")?;
        }

        write!(f, "--{boundary}--\r\n")
    }
}

/// Node of a MIME tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// Leaf part.
    Single(Part),
    /// Nested container.
    Multipart(Multipart),
}

impl Entity {
    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(part) => {
                write!(f, "{}\r\n{}", part.headers(), part.body.encoded())
            }
            Self::Multipart(multipart) => {
                write!(f, "Content-Type: {}\r\n\r\n", multipart.content_type())?;
                multipart.write_body(f)
            }
        }
    }
}

/// Complete MIME message: top-level headers over a root container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message headers (Subject, From, To, ...).
    pub headers: Headers,
    /// Root container.
    pub root: Multipart,
}

impl Message {
    /// Creates a message with no headers.
    #[must_use]
    pub fn new(root: Multipart) -> Self {
        Self {
            headers: Headers::new(),
            root,
        }
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Message-Id header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id")
    }
}

/// Renders the message in wire format with CRLF line endings.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Content-Type: {}\r\n", self.root.content_type())?;
        write!(f, "MIME-Version: 1.0\r\n")?;
        write!(f, "{}\r\n", self.headers)?;
        self.root.write_body(f)
    }
}
