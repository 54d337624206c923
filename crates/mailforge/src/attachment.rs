//! Attachment descriptors and their MIME parts.

use mailforge_mime::{ContentType, Part, PartBody};

use crate::error::Result;

/// A file to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Filename for the `Content-Disposition` header. Empty means inline.
    pub filename: String,
    /// Raw bytes.
    pub content: Vec<u8>,
    /// Explicit content type; guessed from `filename` when absent.
    pub content_type: Option<String>,
}

impl Attachment {
    /// Creates an attachment whose type is guessed from the filename.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            content_type: None,
        }
    }

    /// Overrides the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Resolves the content type: explicit, else guessed, else
    /// `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit content type is malformed.
    pub fn resolved_content_type(&self) -> Result<ContentType> {
        match &self.content_type {
            Some(explicit) => Ok(explicit.parse()?),
            None => Ok(ContentType::guess_or_octet_stream(&self.filename)),
        }
    }

    /// Converts into a MIME part, branching on the top-level type.
    ///
    /// Text that is not valid UTF-8 is carried as base64 under its
    /// declared type.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit content type is malformed.
    pub fn into_part(self) -> Result<Part> {
        let content_type = self.resolved_content_type()?;

        let body = match content_type.main_type.as_str() {
            "text" => match String::from_utf8(self.content) {
                Ok(text) => PartBody::Text {
                    subtype: content_type.sub_type,
                    content: text,
                },
                Err(e) => PartBody::Binary {
                    content_type,
                    data: e.into_bytes(),
                },
            },
            "image" => PartBody::Image {
                subtype: content_type.sub_type,
                data: self.content,
            },
            "audio" => PartBody::Audio {
                subtype: content_type.sub_type,
                data: self.content,
            },
            _ => PartBody::Binary {
                content_type,
                data: self.content,
            },
        };

        let part = Part::new(body);
        if self.filename.is_empty() {
            Ok(part)
        } else {
            Ok(part.with_filename(self.filename))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailforge_mime::TransferEncoding;

    #[test]
    fn test_pdf_is_guessed() {
        let part = Attachment::new("report.pdf", b"%PDF-1.4".to_vec())
            .into_part()
            .unwrap();

        assert_eq!(part.body.content_type().essence(), "application/pdf");
        assert_eq!(
            part.headers().get("Content-Disposition"),
            Some("attachment; filename=\"report.pdf\"")
        );
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        let part = Attachment::new("data.zzqx", vec![1, 2, 3]).into_part().unwrap();

        assert_eq!(part.body.content_type().essence(), "application/octet-stream");
        assert_eq!(part.body.transfer_encoding(), TransferEncoding::Base64);
    }

    #[test]
    fn test_text_branch() {
        let part = Attachment::new("table.csv", "a,b\n1,2").into_part().unwrap();

        assert_eq!(
            part.body,
            PartBody::Text {
                subtype: "csv".to_string(),
                content: "a,b\n1,2".to_string(),
            }
        );
        assert_eq!(part.body.content_type().charset(), Some("utf-8"));
    }

    #[test]
    fn test_invalid_utf8_text_falls_back_to_binary() {
        let part = Attachment::new("legacy.txt", vec![0xff, 0xfe, 0x00])
            .into_part()
            .unwrap();

        assert!(matches!(part.body, PartBody::Binary { .. }));
        assert_eq!(part.body.content_type().essence(), "text/plain");
        assert_eq!(part.body.transfer_encoding(), TransferEncoding::Base64);
    }

    #[test]
    fn test_image_and_audio_keep_subtype() {
        let image = Attachment::new("logo.png", vec![0x89]).into_part().unwrap();
        let audio = Attachment::new("voice.bin", vec![1])
            .with_content_type("audio/ogg")
            .into_part()
            .unwrap();

        assert!(matches!(image.body, PartBody::Image { ref subtype, .. } if subtype == "png"));
        assert!(matches!(audio.body, PartBody::Audio { ref subtype, .. } if subtype == "ogg"));
    }

    #[test]
    fn test_explicit_type_overrides_guess() {
        let part = Attachment::new("invoice.pdf", vec![1])
            .with_content_type("application/octet-stream")
            .into_part()
            .unwrap();
        assert_eq!(part.body.content_type().essence(), "application/octet-stream");
    }

    #[test]
    fn test_malformed_explicit_type() {
        assert!(
            Attachment::new("x", vec![])
                .with_content_type("pdf")
                .into_part()
                .is_err()
        );
    }

    #[test]
    fn test_empty_filename_has_no_disposition() {
        let part = Attachment::new("", vec![1]).into_part().unwrap();
        assert!(part.filename.is_none());
    }
}
