//! Shared fixtures and collaborator doubles for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use mailforge::collaborators::{
    BoxError, Collaborators, FileStore, PdfOptions, PdfRenderer, StoredFile, TextConverter,
};
use mailforge::{Composer, ComposerConfig, FixedClock, TextConversionError};

pub const SITE_URL: &str = "https://erp.example.com";

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("mailforge=debug")
        .try_init();
}

pub fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
}

pub fn config() -> ComposerConfig {
    ComposerConfig::for_site(SITE_URL)
}

pub fn collaborators() -> Collaborators {
    Collaborators::for_site(SITE_URL).unwrap()
}

/// Composer with default collaborators and a fixed clock.
pub fn composer() -> Composer {
    init_tracing();
    Composer::new(config()).unwrap().with_clock(clock())
}

/// Composer with the given collaborators and a fixed clock.
pub fn composer_with(collaborators: Collaborators) -> Composer {
    init_tracing();
    Composer::with_collaborators(config(), collaborators).with_clock(clock())
}

/// In-memory file store.
#[derive(Default)]
pub struct MemoryStore {
    files: HashMap<String, StoredFile>,
}

impl MemoryStore {
    pub fn with_file(mut self, id: &str, filename: &str, content: &[u8]) -> Self {
        self.files.insert(
            id.to_string(),
            StoredFile {
                filename: filename.to_string(),
                content: content.to_vec(),
            },
        );
        self
    }
}

impl FileStore for MemoryStore {
    fn get_file(&self, identifier: &str) -> Result<Option<StoredFile>, BoxError> {
        Ok(self.files.get(identifier).cloned())
    }
}

/// File store whose lookups always fail.
pub struct BrokenStore;

impl FileStore for BrokenStore {
    fn get_file(&self, _identifier: &str) -> Result<Option<StoredFile>, BoxError> {
        Err("storage offline".into())
    }
}

/// PDF renderer that records its inputs and returns a fixed payload.
#[derive(Clone, Default)]
pub struct RecordingPdf {
    pub calls: Arc<Mutex<Vec<(String, PdfOptions)>>>,
}

pub const PDF_BYTES: &[u8] = b"%PDF-1.4 fake";

impl PdfRenderer for RecordingPdf {
    fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((html.to_string(), options.clone()));
        Ok(PDF_BYTES.to_vec())
    }
}

/// PDF renderer that always fails.
pub struct BrokenPdf;

impl PdfRenderer for BrokenPdf {
    fn render(&self, _html: &str, _options: &PdfOptions) -> Result<Vec<u8>, BoxError> {
        Err("renderer crashed".into())
    }
}

/// Text converter that always fails.
pub struct BrokenTextConverter;

impl TextConverter for BrokenTextConverter {
    fn convert(&self, _html: &str) -> Result<String, TextConversionError> {
        Err(TextConversionError("unsupported markup".into()))
    }
}

/// Returns the entity bodies between the given boundary's delimiters.
pub fn sections<'a>(wire: &'a str, boundary: &str) -> Vec<&'a str> {
    let delimiter = format!("--{boundary}\r\n");
    let closing = format!("--{boundary}--");
    let end = wire.find(&closing).unwrap_or(wire.len());
    wire[..end].split(&delimiter).skip(1).collect()
}
