//! Composer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings that would otherwise be read from ambient site state.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Base URL of the originating site.
    ///
    /// Sent in the site header, used to expand relative links, and used
    /// as the host part of generated Message-Ids.
    pub site_url: String,
    /// Name of the header that carries `site_url`.
    pub site_header: String,
    /// Template used to wrap message bodies.
    pub template: String,
    /// Subject used when the caller supplies an empty one.
    pub default_subject: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost".to_string(),
            site_header: "X-Mailforge-Site".to_string(),
            template: crate::collaborators::STANDARD_TEMPLATE.to_string(),
            default_subject: "[No Subject]".to_string(),
        }
    }
}

impl ComposerConfig {
    /// Creates a configuration for the given site URL.
    #[must_use]
    pub fn for_site(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Returns `site_url` without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    /// Returns the bare host name of `site_url`, without port or
    /// credentials.
    #[must_use]
    pub fn site_host(&self) -> &str {
        let url = self.site_url.trim();
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let authority = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(without_scheme);
        let authority = authority
            .rsplit_once('@')
            .map_or(authority, |(_, host)| host);
        let host = match authority.rsplit_once(':') {
            Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => host,
            _ => authority,
        };
        if host.is_empty() { "localhost" } else { host }
    }
}
