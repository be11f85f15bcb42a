//! The text buffer under edit.

use crate::wikitext::enums::PlaceholderSet;
use crate::wikitext::errors::Result;
use crate::wikitext::placeholders::Placeholders;
use crate::wikitext::sections::{self, Section};
use crate::wikitext::site::WikiSyntax;
use crate::wikitext::template_record::TemplateRecord;

/// A wiki page: its title, current wikitext and the site it belongs to.
///
/// Sections and template records never hold the page; their `save` methods
/// take it by `&mut` and patch `text` in one replacement.
pub struct Page<'s> {
    pub title: String,
    pub text: String,
    site: &'s dyn WikiSyntax,
    placeholders: Option<Placeholders>,
}

impl<'s> Page<'s> {
    pub fn new<T: Into<String>, S: Into<String>>(
        site: &'s dyn WikiSyntax,
        title: T,
        text: S,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            site,
            placeholders: None,
        }
    }

    pub fn site(&self) -> &'s dyn WikiSyntax {
        self.site
    }

    /// Hide every match of `categories` behind placeholder tokens.
    ///
    /// Repeated calls add to the same session; one `remove_placeholders`
    /// undoes all of them.
    pub fn insert_placeholders(&mut self, categories: PlaceholderSet) -> usize {
        let session = self.placeholders.get_or_insert_with(Placeholders::new);
        let inserted = session.protect(&mut self.text, categories);
        log::debug!("[{}] {} placeholder(s) active", self.title, session.len());
        inserted
    }

    /// Restore everything hidden by `insert_placeholders`. Does nothing on a
    /// page without placeholders.
    pub fn remove_placeholders(&mut self) {
        if let Some(session) = self.placeholders.take() {
            session.restore(&mut self.text);
        }
    }

    /// The active placeholder session, if any.
    pub fn placeholders(&self) -> Option<&Placeholders> {
        self.placeholders.as_ref()
    }

    /// Top-level sections of the page.
    pub fn sections(&self) -> Vec<Section> {
        sections::build_sections(&self.text, 1)
    }

    pub fn section_by_name(&self, name: &str, recursive: bool) -> Option<Section> {
        sections::get_by_name(self.sections(), name, recursive)
    }

    pub fn section_by_path<S: AsRef<str>>(&self, path: &[S]) -> Result<Option<Section>> {
        sections::get_by_path(self.sections(), path)
    }

    /// One record per template invocation on the page.
    pub fn templates(&self) -> Vec<TemplateRecord> {
        TemplateRecord::extract(self)
    }
}

impl std::fmt::Debug for Page<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("title", &self.title)
            .field("text", &self.text)
            .field("placeholders", &self.placeholders)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::enums::Placeholder;
    use crate::wikitext::site::Site;

    #[test]
    fn placeholders_round_trip_on_page() {
        let site = Site::default();
        let source = "== A ==\n[http://x.org x] {{T}} <!-- c -->";
        let mut page = Page::new(&site, "P", source);
        page.insert_placeholders(PlaceholderSet::default());
        page.insert_placeholders(Placeholder::Template.into());
        assert_eq!(page.placeholders().map(|p| p.len()), Some(3));
        assert!(!page.text.contains("{{T}}"));
        page.remove_placeholders();
        assert_eq!(page.text, source);
        assert!(page.placeholders().is_none());
    }

    #[test]
    fn remove_without_insert_is_noop() {
        let site = Site::default();
        let mut page = Page::new(&site, "P", "plain");
        page.remove_placeholders();
        assert_eq!(page.text, "plain");
    }

    #[test]
    fn section_helpers() {
        let site = Site::default();
        let page = Page::new(&site, "P", "== A ==\n=== B ===\nx\n== C ==\n");
        assert_eq!(page.sections().len(), 2);
        assert!(page.section_by_name("B", true).is_some());
        assert!(page.section_by_name("B", false).is_none());
        let b = page.section_by_path(&["A", "B"]).unwrap().unwrap();
        assert_eq!(b.level(), 3);
    }
}
