//! Header block of a message or part.

use std::fmt;

use crate::encoding::{encode_mailbox, encode_rfc2047};

/// Preferred maximum length of a rendered header line (RFC 5322 §2.1.1).
const MAX_HEADER_LINE: usize = 78;

/// Ordered header fields.
///
/// Names keep the case they were written with; lookups ignore case.
/// Rendering follows insertion order, one `Name: value` field per entry,
/// folded at whitespace when a line would exceed 78 characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    /// Appends a field, keeping earlier fields of the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Sets a field, dropping every other field of the same name.
    ///
    /// A field that already exists keeps its position, so repeated calls
    /// render identically.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let field = (name.into(), value.into());
        let Some(first) = self.position(&field.0) else {
            self.fields.push(field);
            return;
        };

        let mut index = 0;
        self.fields.retain(|(existing, _)| {
            let keep = index <= first || !existing.eq_ignore_ascii_case(&field.0);
            index += 1;
            keep
        });
        self.fields[first] = field;
    }

    /// Sets a free-text field, RFC 2047 encoding it when not plain ASCII.
    pub fn set_text(&mut self, name: impl Into<String>, text: &str) {
        self.set(name, encode_rfc2047(text, "utf-8"));
    }

    /// Sets a single-mailbox field; only the display name is encoded.
    pub fn set_mailbox(&mut self, name: impl Into<String>, mailbox: &str) {
        self.set(name, encode_mailbox(mailbox));
    }

    /// Sets a `, `-joined mailbox list field.
    pub fn set_address_list<S: AsRef<str>>(&mut self, name: impl Into<String>, mailboxes: &[S]) {
        let list = mailboxes
            .iter()
            .map(|mailbox| encode_mailbox(mailbox.as_ref()))
            .collect::<Vec<_>>()
            .join(", ");
        self.set(name, list);
    }

    /// First value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.fields[index].1.as_str())
    }

    /// Every value of a field, in order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Removes every field of that name.
    pub fn remove(&mut self, name: &str) {
        self.fields
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    }

    /// True when no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|(name, value)| {
            write_folded(f, &format!("{name}: {value}"))?;
            f.write_str("\r\n")
        })
    }
}

/// Writes `field` with CRLF inserted before whitespace so no physical line
/// runs past [`MAX_HEADER_LINE`]. Existing folds are kept. A run with no
/// whitespace to break at is written whole.
fn write_folded(f: &mut fmt::Formatter<'_>, field: &str) -> fmt::Result {
    for (index, line) in field.split("\r\n").enumerate() {
        if index > 0 {
            f.write_str("\r\n")?;
        }

        let mut rest = line;
        while rest.len() > MAX_HEADER_LINE {
            let bytes = rest.as_bytes();
            let is_space = |b: &u8| *b == b' ' || *b == b'\t';
            // Position 0 is the fold of the previous segment
            let Some(at) = bytes[1..=MAX_HEADER_LINE]
                .iter()
                .rposition(is_space)
                .or_else(|| {
                    bytes[MAX_HEADER_LINE + 1..]
                        .iter()
                        .position(is_space)
                        .map(|at| at + MAX_HEADER_LINE)
                })
                .map(|at| at + 1)
            else {
                break;
            };

            f.write_str(&rest[..at])?;
            f.write_str("\r\n")?;
            rest = &rest[at..];
        }
        f.write_str(rest)?;
    }
    Ok(())
}
