//! Incremental message construction.
//!
//! A [`MessageBuilder`] owns one message under construction. The MIME tree
//! is a `multipart/mixed` root whose first entity is a
//! `multipart/alternative` container for the body; attachments are
//! appended to the root after it.

use mailforge_mime::{
    ContentType, Entity, Headers, Message, Multipart, MultipartKind, Part, PartBody,
};
use tracing::{debug, warn};

use crate::attachment::Attachment;
use crate::body::HtmlBody;
use crate::collaborators::PdfOptions;
use crate::composer::Composer;
use crate::error::{Error, Result};
use crate::recipients::Recipients;

/// Whether the builder has received its first body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    /// No body yet; the next `set_body` also attaches the plain-text part.
    NoBodySet,
    /// At least one HTML part has been attached.
    BodySet,
}

/// Builds one outgoing message.
#[derive(Debug)]
pub struct MessageBuilder<'a> {
    composer: &'a Composer,
    sender: String,
    reply_to: String,
    recipients: Vec<String>,
    cc: Vec<String>,
    subject: String,
    message_id: Option<String>,
    headers: Headers,
    alternative: Multipart,
    root: Multipart,
    state: BodyState,
}

impl<'a> MessageBuilder<'a> {
    pub(crate) fn new(
        composer: &'a Composer,
        sender: impl Into<String>,
        recipients: impl Into<Recipients>,
        subject: impl Into<String>,
    ) -> Self {
        let sender = sender.into().trim().to_string();
        let mut subject = subject.into();
        if subject.trim().is_empty() {
            subject.clone_from(&composer.config().default_subject);
        }

        let stamp = composer.clock().now().timestamp_millis();

        Self {
            composer,
            reply_to: sender.clone(),
            sender,
            recipients: recipients.into().normalize(),
            cc: Vec::new(),
            subject,
            message_id: None,
            headers: Headers::new(),
            alternative: Multipart::new(MultipartKind::Alternative, boundary(stamp, 1)),
            root: Multipart::new(MultipartKind::Mixed, boundary(stamp, 0)),
            state: BodyState::NoBodySet,
        }
    }

    /// Sets the Reply-To address. Defaults to the sender.
    #[must_use]
    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = reply_to.into().trim().to_string();
        self
    }

    /// Sets the CC list, normalized like the recipients.
    #[must_use]
    pub fn cc(mut self, cc: impl Into<Recipients>) -> Self {
        self.cc = cc.into().normalize();
        self
    }

    /// Renders and attaches an HTML body.
    ///
    /// The first call also attaches the plain-text alternative, ahead of
    /// the HTML part. Later calls only append further HTML parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn set_body(&mut self, body: HtmlBody) -> Result<()> {
        let composer = self.composer;
        let first = self.state == BodyState::NoBodySet;
        let html = match body.pre_rendered {
            Some(html) => html,
            None => {
                let content = body
                    .content
                    .to_html(composer.collaborators().markdown.as_ref());
                composer.format_html(
                    &self.subject,
                    &content,
                    body.footer.as_deref(),
                    body.print_html.as_deref(),
                )?
            }
        };

        if first {
            match body.text_alternative {
                Some(text) => self.set_text(text),
                None => match composer.collaborators().text.convert(&html) {
                    Ok(text) => self.set_text(text),
                    Err(e) => warn!(error = %e, "Skipping plain-text alternative"),
                },
            }
        }

        debug!(len = html.len(), first, "HTML body set");
        self.alternative.push_part(Part::new(PartBody::Html(html)));
        self.state = BodyState::BodySet;
        Ok(())
    }

    /// Attaches a plain-text part to the alternative container.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.alternative.push_part(Part::new(PartBody::Text {
            subtype: "plain".to_string(),
            content: text.into(),
        }));
    }

    /// Attaches a file.
    ///
    /// The content type is `content_type` if given, else guessed from the
    /// filename, else `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if `content_type` is malformed.
    pub fn add_attachment(
        &mut self,
        filename: &str,
        content: impl Into<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let mut attachment = Attachment::new(filename, content);
        attachment.content_type = content_type.map(str::to_string);
        self.attach(attachment)
    }

    /// Attaches a prepared [`Attachment`].
    ///
    /// # Errors
    ///
    /// Returns an error if its content type is malformed.
    pub fn attach(&mut self, attachment: Attachment) -> Result<()> {
        let part = attachment.into_part()?;
        debug!(
            filename = part.filename.as_deref().unwrap_or_default(),
            content_type = %part.body.content_type().essence(),
            size = part.body.len(),
            "Attachment added"
        );
        self.root.push_part(part);
        Ok(())
    }

    /// Attaches a file from the configured file store.
    ///
    /// Does nothing if the store has no file under `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCollaborator`] without a file store, or
    /// [`Error::FileStore`] if the lookup fails.
    pub fn add_attachment_from_store(&mut self, identifier: &str) -> Result<()> {
        let composer = self.composer;
        let store = composer
            .collaborators()
            .files
            .as_ref()
            .ok_or(Error::MissingCollaborator("file store"))?;

        match store.get_file(identifier).map_err(Error::FileStore)? {
            Some(file) => self.add_attachment(&file.filename, file.content, None),
            None => {
                warn!(identifier, "Stored file not found, skipping attachment");
                Ok(())
            }
        }
    }

    /// Renders `html` to PDF and attaches it as `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCollaborator`] without a PDF renderer, or
    /// [`Error::PdfRender`] if rendering fails.
    pub fn add_rendered_document(
        &mut self,
        name: &str,
        html: &str,
        options: Option<&PdfOptions>,
    ) -> Result<()> {
        let composer = self.composer;
        let renderer = composer
            .collaborators()
            .pdf
            .as_ref()
            .ok_or(Error::MissingCollaborator("PDF renderer"))?;

        let default_options = PdfOptions::default();
        let pdf = renderer
            .render(html, options.unwrap_or(&default_options))
            .map_err(Error::PdfRender)?;

        self.attach(
            Attachment::new(name, pdf).with_content_type(ContentType::octet_stream().essence()),
        )
    }

    /// Appends a text part of type `mime_type` to the root container.
    ///
    /// With `as_attachment`, the part gets an attachment disposition
    /// named `filename`, written as `filename=""` when the name is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `mime_type` is malformed.
    pub fn attach_message(
        &mut self,
        content: impl Into<String>,
        mime_type: &str,
        as_attachment: bool,
        filename: &str,
    ) -> Result<()> {
        let content_type: ContentType = mime_type.parse()?;
        let content = content.into();
        let body = if content_type.sub_type == "html" {
            PartBody::Html(content)
        } else {
            PartBody::Text {
                subtype: content_type.sub_type,
                content,
            }
        };

        let part = Part::new(body);
        let part = if as_attachment {
            part.with_filename(filename)
        } else {
            part
        };
        self.root.push_part(part);
        Ok(())
    }

    /// Sets the Message-Id to `<id@host>`, where host comes from the site URL.
    pub fn set_message_id(&mut self, id: &str) {
        let id = id.trim().trim_matches(['<', '>']);
        self.message_id = Some(format!("<{id}@{}>", self.composer.config().site_host()));
    }

    /// Resolves defaults and checks every address.
    ///
    /// An empty sender is taken from the default outgoing account; an
    /// empty reply-to becomes the sender.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSender`], [`Error::NoRecipients`] or the
    /// first [`Error::InvalidAddress`].
    pub fn validate(&mut self) -> Result<()> {
        let collaborators = self.composer.collaborators();
        if self.sender.is_empty() {
            let account = collaborators
                .accounts
                .default_account()
                .ok_or(Error::MissingSender)?;
            self.sender = account.email_id.trim().to_string();
            if self.sender.is_empty() {
                return Err(Error::MissingSender);
            }
        }

        if self.reply_to.is_empty() {
            self.reply_to.clone_from(&self.sender);
        }

        let validator = collaborators.addresses.as_ref();
        for address in [&self.sender, &self.reply_to] {
            if !validator.is_valid(address) {
                return Err(Error::InvalidAddress(address.clone()));
            }
        }

        if self.recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        if let Some(invalid) = self
            .recipients
            .iter()
            .chain(&self.cc)
            .find(|address| !validator.is_valid(address))
        {
            return Err(Error::InvalidAddress(invalid.clone()));
        }

        Ok(())
    }

    /// Writes the top-level headers. Repeated calls replace earlier values.
    pub fn finalize(&mut self) {
        let config = self.composer.config();

        self.headers.set_text("Subject", &self.subject);
        self.headers.set_mailbox("From", &self.sender);
        self.headers.set_address_list("To", &self.recipients);
        self.headers
            .set("Date", self.composer.clock().now().to_rfc2822());
        self.headers.set_mailbox("Reply-To", &self.reply_to);

        if self.cc.is_empty() {
            self.headers.remove("CC");
        } else {
            self.headers.set_address_list("CC", &self.cc);
        }

        if let Some(message_id) = &self.message_id {
            self.headers.set("Message-Id", message_id.as_str());
        }

        self.headers
            .set(config.site_header.as_str(), config.base_url());
    }

    /// Validates, finalizes and renders the message in wire format.
    ///
    /// # Errors
    ///
    /// Returns the first validation error; nothing is rendered then.
    pub fn serialize(mut self) -> Result<String> {
        self.validate()?;
        self.finalize();

        let message = self.into_message();
        let wire = message.to_string();
        debug!(
            subject = message.subject().unwrap_or_default(),
            len = wire.len(),
            "Message serialized"
        );
        Ok(wire)
    }

    /// Returns a snapshot of the MIME tree with the current headers.
    #[must_use]
    pub fn message(&self) -> Message {
        let mut root = Multipart::new(MultipartKind::Mixed, self.root.boundary.clone());
        root.push_multipart(self.alternative.clone());
        root.entities.extend(self.root.entities.iter().cloned());

        let mut message = Message::new(root);
        message.headers = self.headers.clone();
        message
    }

    fn into_message(self) -> Message {
        let mut root = self.root;
        root.entities.insert(0, Entity::Multipart(self.alternative));

        let mut message = Message::new(root);
        message.headers = self.headers;
        message
    }

    /// Returns the body state.
    #[must_use]
    pub const fn state(&self) -> BodyState {
        self.state
    }

    /// Returns the sender.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the reply-to address.
    #[must_use]
    pub fn reply_to_address(&self) -> &str {
        &self.reply_to
    }

    /// Returns the normalized recipients.
    #[must_use]
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Returns the normalized CC list.
    #[must_use]
    pub fn cc_list(&self) -> &[String] {
        &self.cc
    }

    /// Returns the subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// `=_` cannot occur in quoted-printable or base64 output.
fn boundary(stamp: i64, index: usize) -> String {
    format!("=_mf_{stamp:x}_{index}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ComposerConfig;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn composer() -> Composer {
        Composer::new(ComposerConfig::for_site("https://erp.example.com"))
            .unwrap()
            .with_clock(FixedClock(
                Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            ))
    }

    #[test]
    fn test_initial_state() {
        let composer = composer();
        let builder = composer.builder(" a@x.com ", "b@x.com; c@x.com", "");

        assert_eq!(builder.sender(), "a@x.com");
        assert_eq!(builder.reply_to_address(), "a@x.com");
        assert_eq!(builder.recipients(), ["b@x.com", "c@x.com"]);
        assert_eq!(builder.subject(), "[No Subject]");
        assert_eq!(builder.state(), BodyState::NoBodySet);

        let message = builder.message();
        assert_eq!(message.root.kind, MultipartKind::Mixed);
        assert!(matches!(
            message.root.entities.as_slice(),
            [Entity::Multipart(alt)] if alt.kind == MultipartKind::Alternative && alt.entities.is_empty()
        ));
    }

    #[test]
    fn test_boundaries_are_distinct_and_deterministic() {
        let composer = composer();
        let first = composer.builder("a@x.com", "b@x.com", "Hi").message();
        let second = composer.builder("a@x.com", "b@x.com", "Hi").message();

        let alternative = first.root.find(MultipartKind::Alternative).unwrap();
        assert_ne!(first.root.boundary, alternative.boundary);
        assert_eq!(first.root.boundary, second.root.boundary);
        assert!(first.root.boundary.starts_with("=_"));
    }

    #[test]
    fn test_set_message_id() {
        let composer = composer();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi");
        builder.set_message_id("abc123");
        builder.finalize();

        assert_eq!(
            builder.message().message_id(),
            Some("<abc123@erp.example.com>")
        );
    }

    #[test]
    fn test_message_id_host_drops_port() {
        let composer = Composer::new(ComposerConfig::for_site("http://localhost:8000")).unwrap();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi");
        builder.set_message_id("abc");
        builder.set_body(HtmlBody::new("<p>x</p>")).unwrap();

        let wire = builder.serialize().unwrap();
        assert!(wire.contains("Message-Id: <abc@localhost>\r\n"));
        assert!(wire.contains("X-Mailforge-Site: http://localhost:8000\r\n"));
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let composer = composer();
        let mut builder = composer
            .builder("a@x.com", "b@x.com", "Hi")
            .cc("c@x.com");
        builder.finalize();
        let first = builder.message().headers;
        builder.finalize();

        assert_eq!(builder.message().headers, first);
        assert_eq!(first.get_all("Subject").len(), 1);
        assert_eq!(first.get("CC"), Some("c@x.com"));
        assert_eq!(first.get("Date"), Some("Fri, 1 Mar 2024 09:30:00 +0000"));
        assert_eq!(first.get("X-Mailforge-Site"), Some("https://erp.example.com"));
    }

    #[test]
    fn test_finalize_omits_empty_cc_and_message_id() {
        let composer = composer();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi");
        builder.finalize();
        let headers = builder.message().headers;

        assert_eq!(headers.get("CC"), None);
        assert_eq!(headers.get("Message-Id"), None);
    }

    #[test]
    fn test_validate_resolves_empty_reply_to() {
        let composer = composer();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi").reply_to("  ");
        builder.validate().unwrap();
        assert_eq!(builder.reply_to_address(), "a@x.com");
    }

    #[test]
    fn test_validate_rejects_bad_cc() {
        let composer = composer();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi").cc("nobody");
        assert!(matches!(
            builder.validate(),
            Err(Error::InvalidAddress(address)) if address == "nobody"
        ));
    }

    #[test]
    fn test_attach_message_inline_and_attached() {
        let composer = composer();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi");
        builder
            .attach_message("<p>original</p>", "text/html", false, "")
            .unwrap();
        builder
            .attach_message("note", "text/plain", true, "note.txt")
            .unwrap();

        let message = builder.message();
        let parts: Vec<_> = message.root.parts().collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].body, PartBody::Html("<p>original</p>".to_string()));
        assert!(parts[0].filename.is_none());
        assert_eq!(parts[1].filename.as_deref(), Some("note.txt"));
    }

    #[test]
    fn test_attach_message_unnamed_attachment_keeps_disposition() {
        let composer = composer();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi");
        builder
            .attach_message("forwarded", "text/plain", true, "")
            .unwrap();

        let message = builder.message();
        let part = message.root.parts().next().unwrap();
        assert_eq!(
            part.headers().get("Content-Disposition"),
            Some("attachment; filename=\"\"")
        );
    }

    #[test]
    fn test_missing_optional_collaborators() {
        let composer = composer();
        let mut builder = composer.builder("a@x.com", "b@x.com", "Hi");

        assert!(matches!(
            builder.add_attachment_from_store("file-1"),
            Err(Error::MissingCollaborator("file store"))
        ));
        assert!(matches!(
            builder.add_rendered_document("doc.pdf", "<p>x</p>", None),
            Err(Error::MissingCollaborator("PDF renderer"))
        ));
    }
}
