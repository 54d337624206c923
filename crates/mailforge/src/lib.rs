//! # mailforge
//!
//! Outgoing email composition: turns a sender, recipients, subject, body
//! and attachments into a MIME multipart message ready for delivery.
//!
//! ## Features
//!
//! - **Templated bodies**: HTML or Markdown content wrapped in a site
//!   template with footer, signature and unsubscribe placeholder
//! - **Automatic plain-text alternative** generated from the HTML
//! - **Attachments** with content types guessed from filenames
//! - **Pluggable collaborators** for templates, file storage, PDF rendering,
//!   accounts and address validation
//! - **Deterministic output** given an injected clock
//!
//! ## Quick Start
//!
//! ```
//! use mailforge::{Composer, ComposerConfig, HtmlBody};
//!
//! # fn main() -> mailforge::Result<()> {
//! let composer = Composer::new(ComposerConfig::for_site("https://erp.example.com"))?;
//!
//! let mut builder = composer.builder("a@x.com", "b@x.com, c@x.com", "Hi");
//! builder.set_body(HtmlBody::new("hello **world**"))?;
//! builder.add_attachment("report.csv", "a,b\n1,2", None)?;
//!
//! let wire = builder.serialize()?;
//! assert!(wire.contains("To: b@x.com, c@x.com\r\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ### One-call composition
//!
//! ```
//! use mailforge::{Attachment, ComposeRequest, Composer, ComposerConfig};
//!
//! # fn main() -> mailforge::Result<()> {
//! let composer = Composer::new(ComposerConfig::default())?;
//! let request = ComposeRequest::new(vec!["b@x.com"], "Invoice", "<p>Attached.</p>")
//!     .sender("billing@x.com")
//!     .attachment(Attachment::new("invoice.pdf", b"%PDF-1.4".to_vec()));
//!
//! let wire = composer.compose(request)?.serialize()?;
//! assert!(wire.contains("filename=\"invoice.pdf\""));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod body;
mod builder;
mod clock;
mod composer;
mod config;
mod error;
mod footer;
mod recipients;

pub mod collaborators;

pub use attachment::Attachment;
pub use body::{BodyContent, HtmlBody};
pub use builder::{BodyState, MessageBuilder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use composer::{ComposeRequest, Composer};
pub use config::ComposerConfig;
pub use error::{Error, Result, TextConversionError};
pub use footer::{UNSUBSCRIBE_PLACEHOLDER, compose_footer};
pub use recipients::{Recipients, split_addresses};

pub use mailforge_mime as mime;
