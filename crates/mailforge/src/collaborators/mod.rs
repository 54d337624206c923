//! Services the builder delegates to.
//!
//! Each concern is a trait so hosts and tests can substitute their own
//! implementation. Defaults are provided where a real implementation
//! needs nothing from the host: templates (tera), Markdown
//! (pulldown-cmark), HTML-to-text (htmd), link scrubbing (regex) and
//! address syntax checks. File storage and PDF rendering have no default.

mod account;
mod address;
mod markdown;
mod scrub;
mod template;
mod text;

use std::sync::Arc;

pub use account::{AccountResolver, NoAccount, OutgoingAccount, StaticAccount};
pub use address::{AddressValidator, BasicAddressValidator};
pub use markdown::{CommonMarkConverter, MarkdownConverter};
pub use scrub::{LinkScrubber, UrlScrubber};
pub use template::{STANDARD_TEMPLATE, TemplateContext, TemplateRenderer, TeraRenderer};
pub use text::{HtmdConverter, TextConverter};

/// Boxed error returned by collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ordered source of default footer fragments.
pub trait FooterRegistry: Send + Sync {
    /// Returns every registered fragment in registration order.
    fn default_footers(&self) -> Vec<String>;
}

impl FooterRegistry for Vec<String> {
    fn default_footers(&self) -> Vec<String> {
        self.clone()
    }
}

/// File fetched from a [`FileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Original filename.
    pub filename: String,
    /// File contents.
    pub content: Vec<u8>,
}

/// Read access to stored files.
pub trait FileStore: Send + Sync {
    /// Fetches a file by identifier; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns the store's own error when the lookup fails.
    fn get_file(&self, identifier: &str) -> Result<Option<StoredFile>, BoxError>;
}

/// Options passed through to the PDF renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfOptions {
    /// Renderer-specific key/value settings (page size, margins, ...).
    pub settings: Vec<(String, String)>,
}

impl PdfOptions {
    /// Adds a setting.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.push((key.into(), value.into()));
        self
    }
}

/// HTML-to-PDF conversion.
pub trait PdfRenderer: Send + Sync {
    /// Renders HTML into PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns the renderer's own error when conversion fails.
    fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, BoxError>;
}

/// The full set of collaborators used by a [`Composer`](crate::Composer).
#[derive(Clone)]
pub struct Collaborators {
    /// Body template renderer.
    pub templates: Arc<dyn TemplateRenderer>,
    /// Markdown to HTML conversion.
    pub markdown: Arc<dyn MarkdownConverter>,
    /// HTML to plain-text conversion.
    pub text: Arc<dyn TextConverter>,
    /// Bare URL rewriting.
    pub scrubber: Arc<dyn UrlScrubber>,
    /// Address syntax validation.
    pub addresses: Arc<dyn AddressValidator>,
    /// Default outgoing account lookup.
    pub accounts: Arc<dyn AccountResolver>,
    /// Default footer fragments.
    pub footers: Arc<dyn FooterRegistry>,
    /// Stored file access, if available.
    pub files: Option<Arc<dyn FileStore>>,
    /// PDF rendering, if available.
    pub pdf: Option<Arc<dyn PdfRenderer>>,
}

impl Collaborators {
    /// Creates the default collaborator set for a site.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in templates fail to compile.
    pub fn for_site(base_url: &str) -> crate::Result<Self> {
        Ok(Self {
            templates: Arc::new(TeraRenderer::new().map_err(crate::Error::Template)?),
            markdown: Arc::new(CommonMarkConverter::default()),
            text: Arc::new(HtmdConverter::default()),
            scrubber: Arc::new(LinkScrubber::new(base_url)),
            addresses: Arc::new(BasicAddressValidator),
            accounts: Arc::new(NoAccount),
            footers: Arc::new(Vec::<String>::new()),
            files: None,
            pdf: None,
        })
    }

    /// Replaces the template renderer.
    #[must_use]
    pub fn with_templates(mut self, templates: impl TemplateRenderer + 'static) -> Self {
        self.templates = Arc::new(templates);
        self
    }

    /// Replaces the HTML-to-text converter.
    #[must_use]
    pub fn with_text_converter(mut self, text: impl TextConverter + 'static) -> Self {
        self.text = Arc::new(text);
        self
    }

    /// Replaces the address validator.
    #[must_use]
    pub fn with_address_validator(mut self, addresses: impl AddressValidator + 'static) -> Self {
        self.addresses = Arc::new(addresses);
        self
    }

    /// Replaces the account resolver.
    #[must_use]
    pub fn with_accounts(mut self, accounts: impl AccountResolver + 'static) -> Self {
        self.accounts = Arc::new(accounts);
        self
    }

    /// Replaces the footer registry.
    #[must_use]
    pub fn with_footers(mut self, footers: impl FooterRegistry + 'static) -> Self {
        self.footers = Arc::new(footers);
        self
    }

    /// Sets the file store.
    #[must_use]
    pub fn with_file_store(mut self, files: impl FileStore + 'static) -> Self {
        self.files = Some(Arc::new(files));
        self
    }

    /// Sets the PDF renderer.
    #[must_use]
    pub fn with_pdf_renderer(mut self, pdf: impl PdfRenderer + 'static) -> Self {
        self.pdf = Some(Arc::new(pdf));
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("files", &self.files.is_some())
            .field("pdf", &self.pdf.is_some())
            .finish_non_exhaustive()
    }
}
