//! Content-Type values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Fallback type for content that cannot be identified.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A `type/subtype` pair with parameters.
///
/// Types are stored lowercase. Parameters are kept sorted by name so the
/// rendered header is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Top-level type: `text`, `image`, `audio`, `application`, ...
    pub main_type: String,
    /// Subtype: `plain`, `png`, `pdf`, ...
    pub sub_type: String,
    /// Parameters such as `charset` or `boundary`.
    pub parameters: BTreeMap<String, String>,
}

impl ContentType {
    /// Creates a content type without parameters.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into().to_ascii_lowercase(),
            sub_type: sub_type.into().to_ascii_lowercase(),
            parameters: BTreeMap::new(),
        }
    }

    /// `text/<sub_type>; charset=utf-8`.
    #[must_use]
    pub fn text(sub_type: impl Into<String>) -> Self {
        Self::new("text", sub_type).with_parameter("charset", "utf-8")
    }

    /// `text/html; charset=utf-8`.
    #[must_use]
    pub fn text_html() -> Self {
        Self::text("html")
    }

    /// `application/octet-stream`.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// `multipart/mixed` with the given boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// `multipart/alternative` with the given boundary.
    #[must_use]
    pub fn multipart_alternative(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "alternative").with_parameter("boundary", boundary)
    }

    /// Guesses the type from a filename extension.
    ///
    /// Returns `None` for missing or unknown extensions.
    #[must_use]
    pub fn guess(filename: &str) -> Option<Self> {
        let raw = mime_guess::from_path(filename).first_raw()?;
        raw.parse().ok()
    }

    /// Like [`guess`](Self::guess), falling back to [`OCTET_STREAM`].
    #[must_use]
    pub fn guess_or_octet_stream(filename: &str) -> Self {
        Self::guess(filename).unwrap_or_else(Self::octet_stream)
    }

    /// Adds or replaces a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// The `charset` parameter, if any.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset").map(String::as_str)
    }
}

/// Parses `type/subtype; name=value; ...`. Quoted values are unquoted.
impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split(';');
        let essence = segments.next().unwrap_or_default();

        let Some((main_type, sub_type)) = essence.split_once('/') else {
            return Err(Error::MalformedContentType(s.to_string()));
        };
        let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::MalformedContentType(s.to_string()));
        }

        Ok(segments
            .filter_map(|segment| segment.split_once('='))
            .fold(Self::new(main_type, sub_type), |content_type, (name, value)| {
                content_type.with_parameter(name.trim(), value.trim().trim_matches('"'))
            }))
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_ascii_whitespace() || "()<>@,;:\\\"/[]?=".contains(c))
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;
        for (name, value) in &self.parameters {
            if needs_quoting(value) {
                write!(f, "; {name}=\"{value}\"")?;
            } else {
                write!(f, "; {name}={value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_has_utf8_charset() {
        let ct = ContentType::text("csv");
        assert_eq!(ct.essence(), "text/csv");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_parse_normalizes_case() {
        let ct: ContentType = "Text/Plain; Charset=utf-8".parse().unwrap();
        assert_eq!(ct.essence(), "text/plain");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_parse_unquotes_parameters() {
        let ct: ContentType = "multipart/mixed; boundary=\"=_mf_1\"".parse().unwrap();
        assert_eq!(ct.parameters.get("boundary").map(String::as_str), Some("=_mf_1"));
    }

    #[test]
    fn test_parse_rejects_missing_subtype() {
        assert!("application".parse::<ContentType>().is_err());
        assert!("image/".parse::<ContentType>().is_err());
        assert!(matches!(
            "pdf".parse::<ContentType>(),
            Err(Error::MalformedContentType(raw)) if raw == "pdf"
        ));
    }

    #[test]
    fn test_display_quotes_boundary() {
        let ct = ContentType::multipart_alternative("=_abc_1");
        assert_eq!(ct.to_string(), "multipart/alternative; boundary=\"=_abc_1\"");
    }

    #[test]
    fn test_display_parameters_are_sorted() {
        let ct = ContentType::new("text", "plain")
            .with_parameter("format", "flowed")
            .with_parameter("charset", "utf-8");
        assert_eq!(ct.to_string(), "text/plain; charset=utf-8; format=flowed");
    }

    #[test]
    fn test_guess_known_extensions() {
        assert_eq!(ContentType::guess("report.pdf").unwrap().essence(), "application/pdf");
        assert_eq!(ContentType::guess("photo.PNG").unwrap().essence(), "image/png");
        assert_eq!(ContentType::guess("notes.txt").unwrap().essence(), "text/plain");
    }

    #[test]
    fn test_guess_unknown_extension_falls_back() {
        assert!(ContentType::guess("blob.zzqx").is_none());
        assert_eq!(
            ContentType::guess_or_octet_stream("blob.zzqx").essence(),
            OCTET_STREAM
        );
        assert_eq!(ContentType::guess_or_octet_stream("README").essence(), OCTET_STREAM);
    }
}
