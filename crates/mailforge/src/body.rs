//! Message body input.

use crate::collaborators::MarkdownConverter;

/// Body source, classified as HTML or Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyContent {
    /// Ready-made HTML.
    Html(String),
    /// Markdown to be converted before rendering.
    Markdown(String),
}

impl BodyContent {
    /// Classifies `content`: anything whose trimmed form starts with `<`
    /// is HTML, everything else is Markdown.
    #[must_use]
    pub fn detect(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.trim_start().starts_with('<') {
            Self::Html(content)
        } else {
            Self::Markdown(content)
        }
    }

    /// Returns the content as HTML, converting Markdown.
    #[must_use]
    pub fn to_html(&self, markdown: &dyn MarkdownConverter) -> String {
        match self {
            Self::Html(html) => html.clone(),
            Self::Markdown(source) => markdown.convert(source),
        }
    }
}

/// Arguments of [`MessageBuilder::set_body`](crate::MessageBuilder::set_body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlBody {
    /// Body content.
    pub content: BodyContent,
    /// Plain-text alternative; generated from the HTML when absent.
    pub text_alternative: Option<String>,
    /// Explicit footer, placed before signature and default footers.
    pub footer: Option<String>,
    /// Printable HTML block rendered below the content.
    pub print_html: Option<String>,
    /// Fully rendered HTML; skips templating when present.
    pub pre_rendered: Option<String>,
}

impl HtmlBody {
    /// Creates a body, detecting whether `content` is HTML or Markdown.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: BodyContent::detect(content),
            text_alternative: None,
            footer: None,
            print_html: None,
            pre_rendered: None,
        }
    }

    /// Sets the plain-text alternative.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_alternative = Some(text.into());
        self
    }

    /// Sets the explicit footer.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Sets the printable HTML block.
    #[must_use]
    pub fn with_print_html(mut self, print_html: impl Into<String>) -> Self {
        self.print_html = Some(print_html.into());
        self
    }

    /// Uses `html` as-is instead of rendering the template.
    #[must_use]
    pub fn pre_rendered(mut self, html: impl Into<String>) -> Self {
        self.pre_rendered = Some(html.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::CommonMarkConverter;

    #[test]
    fn test_detect() {
        assert!(matches!(BodyContent::detect("  <p>x</p>"), BodyContent::Html(_)));
        assert!(matches!(BodyContent::detect("hello **world**"), BodyContent::Markdown(_)));
        assert!(matches!(BodyContent::detect(""), BodyContent::Markdown(_)));
    }

    #[test]
    fn test_to_html() {
        let converter = CommonMarkConverter::default();
        assert_eq!(
            BodyContent::detect("<b>as is</b>").to_html(&converter),
            "<b>as is</b>"
        );
        assert!(
            BodyContent::detect("hello **world**")
                .to_html(&converter)
                .contains("<strong>world</strong>")
        );
    }
}
