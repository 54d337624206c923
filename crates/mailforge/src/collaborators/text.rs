//! HTML to plain-text conversion for the text alternative.

use htmd::HtmlToMarkdown;

use crate::error::TextConversionError;

/// Converts rendered HTML into a plain-text alternative.
pub trait TextConverter: Send + Sync {
    /// Converts `html` to text.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTML cannot be converted.
    fn convert(&self, html: &str) -> Result<String, TextConversionError>;
}

/// Converter producing Markdown-flavoured text, which reads well in
/// plain-text mail clients.
///
/// Document metadata (`<head>`, `<style>`, `<script>`) is skipped.
#[derive(Debug, Clone)]
pub struct HtmdConverter {
    skip_tags: Vec<&'static str>,
}

impl Default for HtmdConverter {
    fn default() -> Self {
        Self {
            skip_tags: vec!["head", "style", "script"],
        }
    }
}

impl TextConverter for HtmdConverter {
    fn convert(&self, html: &str) -> Result<String, TextConversionError> {
        HtmlToMarkdown::builder()
            .skip_tags(self.skip_tags.clone())
            .build()
            .convert(html)
            .map(|text| text.trim().to_string())
            .map_err(|e| TextConversionError(Box::new(e)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_markup_to_text() {
        let text = HtmdConverter::default()
            .convert("<html><head><title>Ignored</title><style>p{}</style></head><body><p>hello <strong>world</strong></p></body></html>")
            .unwrap();

        assert!(text.contains("hello **world**"));
        assert!(!text.contains("Ignored"));
        assert!(!text.contains('<'));
    }
}
