//! Link rewriting for message bodies.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Rewrites URLs inside body HTML.
pub trait UrlScrubber: Send + Sync {
    /// Returns `text` with URLs rewritten.
    fn rewrite(&self, text: &str) -> String;
}

#[allow(clippy::unwrap_used)]
static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).unwrap());

#[allow(clippy::unwrap_used)]
static ANCHOR_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<a[\s>]").unwrap());

#[allow(clippy::unwrap_used)]
static RELATIVE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(href|src)\s*=\s*(["'])(/[^"']*)"#).unwrap());

/// Default scrubber.
///
/// Expands root-relative `href`/`src` attributes against the site URL and
/// wraps bare `http(s)` URLs in anchors. URLs already inside a tag or an
/// `<a>` element are left alone.
#[derive(Debug, Clone)]
pub struct LinkScrubber {
    base_url: String,
}

impl LinkScrubber {
    /// Creates a scrubber for the given site URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn expand_relative(&self, text: &str) -> String {
        RELATIVE_LINK
            .replace_all(text, |caps: &Captures<'_>| {
                let path = &caps[3];
                if path.starts_with("//") {
                    // Protocol-relative, already absolute
                    caps[0].to_string()
                } else {
                    format!("{}={}{}{path}", &caps[1], &caps[2], self.base_url)
                }
            })
            .into_owned()
    }
}

impl UrlScrubber for LinkScrubber {
    fn rewrite(&self, text: &str) -> String {
        link_bare_urls(&self.expand_relative(text))
    }
}

/// Drops trailing sentence punctuation from a matched URL. A closing
/// parenthesis stays when it balances one inside the URL.
fn trim_url(mut url: &str) -> &str {
    loop {
        url = url.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        match url.strip_suffix(')') {
            Some(stripped) if url.matches(')').count() > url.matches('(').count() => {
                url = stripped;
            }
            _ => return url,
        }
    }
}

fn link_bare_urls(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for found in BARE_URL.find_iter(text) {
        let url = trim_url(found.as_str());
        let start = found.start();
        let before = &lower[..start];

        let inside_tag = before.rfind('<') > before.rfind('>');
        let inside_anchor =
            ANCHOR_OPEN.find_iter(before).count() > before.matches("</a>").count();
        if url.is_empty() || inside_tag || inside_anchor {
            continue;
        }

        result.push_str(&text[last..start]);
        result.push_str(&format!("<a href=\"{url}\">{url}</a>"));
        last = start + url.len();
    }

    result.push_str(&text[last..]);
    result
}
