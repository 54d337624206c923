//! Shared composition context.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::attachment::Attachment;
use crate::body::HtmlBody;
use crate::builder::MessageBuilder;
use crate::clock::{Clock, SystemClock};
use crate::collaborators::{Collaborators, TemplateContext};
use crate::config::ComposerConfig;
use crate::error::{Error, Result};
use crate::footer::compose_footer;
use crate::recipients::Recipients;

/// Holds configuration, clock and collaborators, and hands out builders.
///
/// A `Composer` is read-only once built and can be shared between threads.
#[derive(Clone)]
pub struct Composer {
    config: ComposerConfig,
    clock: Arc<dyn Clock>,
    collaborators: Collaborators,
}

impl Composer {
    /// Creates a composer with the default collaborators and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in template fails to compile.
    pub fn new(config: ComposerConfig) -> Result<Self> {
        let collaborators = Collaborators::for_site(config.base_url())?;
        Ok(Self::with_collaborators(config, collaborators))
    }

    /// Creates a composer with explicit collaborators.
    #[must_use]
    pub fn with_collaborators(config: ComposerConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            collaborators,
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Returns the collaborators.
    #[must_use]
    pub const fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Returns the clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Starts a message.
    ///
    /// An empty `sender` is resolved from the default account on
    /// validation. An empty `subject` is replaced by the configured
    /// default subject.
    #[must_use]
    pub fn builder(
        &self,
        sender: impl Into<String>,
        recipients: impl Into<Recipients>,
        subject: impl Into<String>,
    ) -> MessageBuilder<'_> {
        MessageBuilder::new(self, sender, recipients, subject)
    }

    /// Builds a message with body and attachments in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the body fails to render or an attachment has
    /// a malformed content type.
    pub fn compose(&self, request: ComposeRequest) -> Result<MessageBuilder<'_>> {
        let ComposeRequest {
            recipients,
            sender,
            subject,
            content,
            text_content,
            footer,
            print_html,
            formatted,
            attachments,
        } = request;

        let mut builder = self.builder(sender, recipients, subject);

        let mut body = HtmlBody::new(content);
        body.text_alternative = text_content;
        body.footer = footer;
        body.print_html = print_html;
        body.pre_rendered = formatted;
        builder.set_body(body)?;

        debug!(attachments = attachments.len(), "Composing message");
        for attachment in attachments {
            builder.attach(attachment)?;
        }

        Ok(builder)
    }

    /// Returns the footer for a body: `explicit`, then the default
    /// account's signature and footer or the registered fragments.
    #[must_use]
    pub fn footer(&self, explicit: Option<&str>) -> String {
        let account = self.collaborators.accounts.default_account();
        compose_footer(
            explicit,
            account.as_ref(),
            self.collaborators.footers.as_ref(),
        )
    }

    /// Wraps HTML content in the configured template.
    ///
    /// URLs in `content` are rewritten by the scrubber first. The
    /// template receives `content`, `footer`, `title`, `subject` and
    /// `print_html` (null when absent).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if rendering fails.
    pub fn format_html(
        &self,
        subject: &str,
        content: &str,
        footer: Option<&str>,
        print_html: Option<&str>,
    ) -> Result<String> {
        let mut context = TemplateContext::new();
        context.insert(
            "content".to_string(),
            Value::from(self.collaborators.scrubber.rewrite(content)),
        );
        context.insert("footer".to_string(), Value::from(self.footer(footer)));
        context.insert("title".to_string(), Value::from(subject));
        context.insert("subject".to_string(), Value::from(subject));
        context.insert(
            "print_html".to_string(),
            print_html.map_or(Value::Null, Value::from),
        );

        self.collaborators
            .templates
            .render(&self.config.template, &context)
            .map_err(Error::Template)
    }
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("config", &self.config)
            .field("collaborators", &self.collaborators)
            .finish_non_exhaustive()
    }
}

/// Everything needed to build a message in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    /// Recipients.
    pub recipients: Recipients,
    /// Sender; empty means the default account.
    pub sender: String,
    /// Subject; empty means the configured default.
    pub subject: String,
    /// Body as HTML or Markdown.
    pub content: String,
    /// Plain-text alternative.
    pub text_content: Option<String>,
    /// Explicit footer.
    pub footer: Option<String>,
    /// Printable HTML block.
    pub print_html: Option<String>,
    /// Pre-rendered HTML; skips templating.
    pub formatted: Option<String>,
    /// Files to attach.
    pub attachments: Vec<Attachment>,
}

impl ComposeRequest {
    /// Creates a request with no sender, extras or attachments.
    #[must_use]
    pub fn new(
        recipients: impl Into<Recipients>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            recipients: recipients.into(),
            sender: String::new(),
            subject: subject.into(),
            content: content.into(),
            text_content: None,
            footer: None,
            print_html: None,
            formatted: None,
            attachments: Vec::new(),
        }
    }

    /// Sets the sender.
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collaborators::{OutgoingAccount, StaticAccount};

    #[test]
    fn test_format_html_wraps_and_scrubs() {
        let composer = Composer::new(ComposerConfig::for_site("https://erp.example.com")).unwrap();
        let html = composer
            .format_html("Hello", "<p>See https://example.org now</p>", None, None)
            .unwrap();

        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains(r#"<a href="https://example.org">https://example.org</a>"#));
        assert!(html.contains(crate::UNSUBSCRIBE_PLACEHOLDER));
    }

    #[test]
    fn test_footer_uses_default_account() {
        let config = ComposerConfig::default();
        let collaborators = Collaborators::for_site(config.base_url())
            .unwrap()
            .with_accounts(StaticAccount(
                OutgoingAccount::new("a@x.com").with_signature("Thanks"),
            ))
            .with_footers(vec!["X".to_string(), "Y".to_string()]);
        let composer = Composer::with_collaborators(config, collaborators);

        assert_eq!(
            composer.footer(None),
            format!("ThanksXY{}", crate::UNSUBSCRIBE_PLACEHOLDER)
        );
    }

    #[test]
    fn test_compose_sets_body_and_attachments() {
        let composer = Composer::new(ComposerConfig::default()).unwrap();
        let request = ComposeRequest::new("b@x.com", "Report", "hello **world**")
            .sender("a@x.com")
            .attachment(Attachment::new("report.pdf", b"%PDF".to_vec()));

        let builder = composer.compose(request).unwrap();
        let message = builder.message();

        assert_eq!(builder.state(), crate::BodyState::BodySet);
        assert_eq!(message.root.parts().count(), 1);
        assert_eq!(
            message
                .root
                .find(mailforge_mime::MultipartKind::Alternative)
                .unwrap()
                .entities
                .len(),
            2
        );
    }
}
