//! Recipient list normalization.

/// Recipient input: one delimited string or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Addresses separated by `,`, `;` or newlines.
    Delimited(String),
    /// One address per entry.
    List(Vec<String>),
}

impl Recipients {
    /// Normalizes into an ordered list of trimmed, non-empty addresses.
    #[must_use]
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Delimited(text) => split_addresses(text),
            Self::List(entries) => entries
                .iter()
                .map(|entry| entry.trim())
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<&str> for Recipients {
    fn from(text: &str) -> Self {
        Self::Delimited(text.to_string())
    }
}

impl From<String> for Recipients {
    fn from(text: String) -> Self {
        Self::Delimited(text)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(entries: Vec<String>) -> Self {
        Self::List(entries)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(entries: Vec<&str>) -> Self {
        Self::List(entries.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(entries: [&str; N]) -> Self {
        Self::List(entries.iter().map(|entry| (*entry).to_string()).collect())
    }
}

/// Splits on `,`, `;`, `\r` and `\n`, trims, and drops empty entries.
#[must_use]
pub fn split_addresses(text: &str) -> Vec<String> {
    text.split([',', ';', '\n', '\r'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
