//! Heading-based section tree.
//!
//! A page splits into sections at the shallowest heading level present; each
//! section splits the same way into its subsections, one level deeper at
//! least. Text in front of the first heading of a level belongs to no section
//! at that level and is left out of the tree.
//!
//! Sections are edited by changing their content and calling
//! [`Section::save`], which swaps the text the section was built from for the
//! new content inside the page.

use std::collections::VecDeque;

use crate::wikitext::errors::{Result, WtError};
use crate::wikitext::page::Page;
use crate::wikitext::patterns;

/// A heading line and everything up to the next heading of the same level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    content: String,
    title: String,
    level: usize,
    original_content: String,
}

/// Split `text` into sections whose heading level is the shallowest one found
/// at or below `min_level`.
///
/// Deeper headings stay inside their parent's content and are reached through
/// [`Section::subsections`].
pub fn build_sections(text: &str, min_level: usize) -> Vec<Section> {
    let matches: Vec<patterns::HeadingMatch> = patterns::headings(text)
        .into_iter()
        .filter(|h| h.level >= min_level)
        .collect();

    let Some(lowest) = matches.iter().map(|h| h.level).min() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut last_heading: Option<usize> = None;

    for heading in matches.iter().filter(|h| h.level == lowest) {
        if let Some(prev) = last_heading {
            out.push(Section::new(&text[prev..heading.start], lowest));
        }
        last_heading = Some(heading.start);
    }
    if let Some(prev) = last_heading {
        out.push(Section::new(&text[prev..], lowest));
    }

    log::trace!(
        "built {} section(s) at level {} (min {})",
        out.len(),
        lowest,
        min_level
    );
    out
}

/// Breadth-first search for the first section titled `name`.
///
/// Only the given sections are checked unless `recursive` is set.
pub fn get_by_name<I>(sections: I, name: &str, recursive: bool) -> Option<Section>
where
    I: IntoIterator<Item = Section>,
{
    let mut queue: VecDeque<Section> = sections.into_iter().collect();

    while let Some(section) = queue.pop_front() {
        if section.title == name {
            return Some(section);
        }
        if recursive {
            queue.extend(section.subsections());
        }
    }

    None
}

/// Follow `path` title by title down the tree.
///
/// Each step searches the current candidates in order, and on a hit replaces
/// them with the hit's subsections. Returns `Ok(None)` when a step finds
/// nothing and a precondition error when `path` is empty.
pub fn get_by_path<I, S>(sections: I, path: &[S]) -> Result<Option<Section>>
where
    I: IntoIterator<Item = Section>,
    S: AsRef<str>,
{
    if path.is_empty() {
        return Err(WtError::precondition("path cant be empty"));
    }

    let mut depth = 0usize;
    let mut queue: VecDeque<Section> = sections.into_iter().collect();

    while let Some(section) = queue.pop_front() {
        if section.title != path[depth].as_ref() {
            continue;
        }
        depth += 1;
        if depth == path.len() {
            return Ok(Some(section));
        }
        queue = section.subsections().into_iter().collect();
    }

    Ok(None)
}

impl Section {
    fn new(content: &str, level: usize) -> Self {
        let title = patterns::leading_heading(content)
            .map(|h| h.title)
            .unwrap_or_default();
        Self {
            content: content.to_string(),
            title,
            level,
            original_content: content.to_string(),
        }
    }

    /// Heading line plus body, as currently edited.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of `=` on each side of the heading.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The page text this section will replace on the next save.
    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    /// True when the content differs from what the page holds for it.
    pub fn is_modified(&self) -> bool {
        self.content != self.original_content
    }

    /// Replace the whole content. Title and level are re-read from the new
    /// heading line, which has to start the content.
    pub fn set_content<S: Into<String>>(&mut self, content: S) -> Result<()> {
        let content = content.into();
        let heading = patterns::leading_heading(&content).ok_or_else(|| {
            WtError::precondition("section content must start with a heading line")
        })?;
        self.level = heading.level;
        self.title = heading.title;
        self.content = content;
        Ok(())
    }

    /// Rewrite the heading line as `== title ==`, keeping the level and the
    /// body untouched.
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        if title.contains('=') || title.contains('\n') || title.trim().is_empty() {
            return Err(WtError::precondition(format!(
                "'{}' cannot be used as a heading title",
                title
            )));
        }
        let heading = patterns::leading_heading(&self.content).ok_or_else(|| {
            WtError::precondition("section content must start with a heading line")
        })?;
        let marker = "=".repeat(self.level);
        self.content = format!(
            "{} {} {}{}",
            marker,
            title,
            marker,
            &self.content[heading.marker_end..]
        );
        self.title = title.to_string();
        Ok(())
    }

    /// Child sections, rebuilt from the current content on every call.
    pub fn subsections(&self) -> Vec<Section> {
        build_sections(&self.content, self.level + 1)
    }

    /// Write the content into `page` in place of the first occurrence of the
    /// original content. Afterwards the current content becomes the anchor,
    /// so saving again without edits changes nothing.
    ///
    /// Returns false when the anchor is no longer in the page; the page is
    /// left untouched in that case.
    ///
    /// Subsections built before the save keep their old anchors. Rebuild them
    /// after editing a parent's content directly.
    pub fn save(&mut self, page: &mut Page<'_>) -> bool {
        let found = page.text.contains(&self.original_content);
        if found {
            page.text = page.text.replacen(&self.original_content, &self.content, 1);
            log::debug!("[{}] saved section '{}'", page.title, self.title);
        } else {
            log::warn!(
                "[{}] section '{}' not found in page text, nothing saved",
                page.title,
                self.title
            );
        }
        self.original_content = self.content.clone();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::site::Site;

    const NESTED: &str = "lead\n= Intro =\nhello\n== History ==\nold\n=== Early ===\nvery old\n\
        == Today ==\nnew\n= Outro =\nbye\n";

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title()).collect()
    }

    #[test]
    fn levels_two_two_three() {
        let text = "preamble\n== A ==\na\n== B ==\nb\n=== C ===\nc\n";
        let top = build_sections(text, 1);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|s| s.level() == 2));
        assert_eq!(titles(&top), vec!["A", "B"]);

        let subs = top[1].subsections();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].level(), 3);
        assert_eq!(subs[0].content(), "=== C ===\nc\n");
        assert!(top[0].subsections().is_empty());

        assert!(top.iter().all(|s| !s.content().contains("preamble")));
    }

    #[test]
    fn sections_cover_text_from_first_heading() {
        let text = "x\n== A ==\na\n== B ==\nb";
        let top = build_sections(text, 1);
        let joined: String = top.iter().map(|s| s.content()).collect();
        assert_eq!(joined, &text[2..]);
    }

    #[test]
    fn no_headings_no_sections() {
        assert!(build_sections("just text\nmore", 1).is_empty());
        assert!(build_sections("== A ==\n", 3).is_empty());
    }

    #[test]
    fn skipped_level_is_still_reached() {
        let top = build_sections("= A =\n=== Deep ===\nx\n", 1);
        assert_eq!(top.len(), 1);
        let subs = top[0].subsections();
        assert_eq!(subs.len(), 1);
        assert_eq!((subs[0].title(), subs[0].level()), ("Deep", 3));
    }

    #[test]
    fn get_by_name_breadth_first() {
        let top = build_sections(NESTED, 1);
        assert_eq!(titles(&top), vec!["Intro", "Outro"]);
        assert!(get_by_name(top.clone(), "Early", false).is_none());
        let early = get_by_name(top.clone(), "Early", true).unwrap();
        assert_eq!(early.content(), "=== Early ===\nvery old\n");
        assert!(get_by_name(top, "Missing", true).is_none());
    }

    #[test]
    fn get_by_path_exact_match() {
        let top = build_sections(NESTED, 1);
        let early = get_by_path(top.clone(), &["Intro", "History", "Early"])
            .unwrap()
            .unwrap();
        assert_eq!(early.level(), 3);
        assert!(
            get_by_path(top.clone(), &["Intro", "Nope"])
                .unwrap()
                .is_none()
        );
        assert!(get_by_path(top.clone(), &["Early"]).unwrap().is_none());

        let empty: [&str; 0] = [];
        let err = get_by_path(top, &empty).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn save_patches_page_and_is_idempotent() {
        let site = Site::default();
        let mut page = Page::new(&site, "P", NESTED);
        let mut history = page.section_by_name("History", true).unwrap();
        let edited = history.content().replace("old\n=", "older\n=");
        history.set_content(edited).unwrap();
        assert!(history.is_modified());

        assert!(history.save(&mut page));
        let once = page.text.clone();
        assert!(once.contains("older\n=== Early"));
        assert!(!history.is_modified());

        assert!(history.save(&mut page));
        assert_eq!(page.text, once);
    }

    #[test]
    fn set_title_rewrites_heading_only() {
        let site = Site::default();
        let mut page = Page::new(&site, "P", "== Old ==\nbody\n== Next ==\n");
        let mut s = page.sections().remove(0);
        s.set_title("New").unwrap();
        assert_eq!(s.title(), "New");
        assert_eq!(s.content(), "== New ==\nbody\n");
        s.save(&mut page);
        assert_eq!(page.text, "== New ==\nbody\n== Next ==\n");

        assert!(s.set_title("a=b").unwrap_err().is_precondition());
    }

    #[test]
    fn set_content_rereads_heading() {
        let mut s = build_sections("== A ==\nx", 1).remove(0);
        s.set_content("=== B ===\ny").unwrap();
        assert_eq!((s.title(), s.level()), ("B", 3));
        assert!(s.set_content("no heading").is_err());
        assert_eq!(s.title(), "B");
    }

    #[test]
    fn stale_child_after_parent_edit_is_not_saved() {
        let site = Site::default();
        let mut page = Page::new(&site, "P", "== A ==\n=== B ===\nb\n");
        let mut parent = page.sections().remove(0);
        let mut child = parent.subsections().remove(0);

        parent.set_content("== A ==\n=== B ===\nchanged\n").unwrap();
        parent.save(&mut page);

        child.set_content("=== B ===\nlost\n").unwrap();
        assert!(!child.save(&mut page));
        assert_eq!(page.text, "== A ==\n=== B ===\nchanged\n");
    }
}
