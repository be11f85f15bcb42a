//! Placeholder protection.
//!
//! Fragile markup (links, templates, comments, ...) is swapped for opaque
//! tokens `~:<N>:~` before running text transformations that should not
//! touch it, and swapped back afterwards. The session value [`Placeholders`]
//! records every substitution; it travels with the text it was applied to
//! (see `Page::insert_placeholders`) instead of living in global state.

use serde::{Deserialize, Serialize};

use crate::wikitext::enums::PlaceholderSet;
use crate::wikitext::patterns;

/// One substitution: the token written into the text and what it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderEntry {
    pub token: String,
    pub original: String,
}

/// Ordered record of the substitutions made on one text buffer.
///
/// Tokens are numbered by insertion count, so they are unique and strictly
/// increasing for the lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholders {
    entries: Vec<PlaceholderEntry>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitutions made so far, oldest first.
    pub fn entries(&self) -> &[PlaceholderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original text hidden behind `token`, if this session minted it.
    pub fn original(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.token == token)
            .map(|e| e.original.as_str())
    }

    /// Replace every match of every enabled category in `text` with a fresh
    /// token. Categories run in their fixed order; each one scans the text as
    /// left by the previous one.
    ///
    /// Calling this again on the same session is additive: numbering
    /// continues where it stopped. Returns the number of tokens inserted.
    pub fn protect(&mut self, text: &mut String, categories: PlaceholderSet) -> usize {
        let before = self.entries.len();

        for category in categories.iter() {
            let ranges = patterns::find_all(category, text);
            if ranges.is_empty() {
                continue;
            }

            let mut out = String::with_capacity(text.len());
            let mut last = 0usize;
            for range in ranges {
                out.push_str(&text[last..range.start]);
                let token = self.mint(&text[range.clone()]);
                out.push_str(&token);
                last = range.end;
            }
            out.push_str(&text[last..]);

            log::trace!(
                "protected {} fragment(s) of {}",
                self.entries.len() - before,
                category
            );
            *text = out;
        }

        let inserted = self.entries.len() - before;
        log::debug!("inserted {} placeholder(s)", inserted);
        inserted
    }

    /// Put every original fragment back, newest token first, and end the
    /// session.
    pub fn restore(self, text: &mut String) {
        log::debug!("restoring {} placeholder(s)", self.entries.len());
        for entry in self.entries.iter().rev() {
            if !text.contains(&entry.token) {
                log::warn!("placeholder {} no longer present in text", entry.token);
                continue;
            }
            *text = text.replace(&entry.token, &entry.original);
        }
    }

    fn mint(&mut self, original: &str) -> String {
        let token = format!("~:{}:~", self.entries.len());
        self.entries.push(PlaceholderEntry {
            token: token.clone(),
            original: original.to_string(),
        });
        token
    }
}
