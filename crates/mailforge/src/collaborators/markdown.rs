//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Converts Markdown source into HTML.
pub trait MarkdownConverter: Send + Sync {
    /// Converts `text` to HTML.
    fn convert(&self, text: &str) -> String;
}

/// CommonMark converter with tables and strikethrough enabled.
#[derive(Debug, Clone, Copy)]
pub struct CommonMarkConverter {
    options: Options,
}

impl Default for CommonMarkConverter {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }
}

impl MarkdownConverter for CommonMarkConverter {
    fn convert(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut output, Parser::new_ext(text, self.options));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis() {
        let html = CommonMarkConverter::default().convert("hello **world**");
        assert_eq!(html.trim(), "<p>hello <strong>world</strong></p>");
    }

    #[test]
    fn test_list_and_strikethrough() {
        let html = CommonMarkConverter::default().convert("- one\n- ~~two~~\n");
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<del>two</del>"));
    }
}
