//! Recognition patterns for headings, links, templates and protective tags.
//!
//! Most patterns are plain `lazy_regex` statics. Three of them need features
//! the `regex` crate does not offer (back-references, look-around, balanced
//! groups) so they are exposed as scanner functions instead:
//!
//! - headings: `^(=+)\s?([^=]+?)\s?\1\s*$` per line. The opening and closing
//!   runs must have the same length.
//! - external links: a `[...]` pair without brackets inside that is neither
//!   preceded by `[` nor followed by `]`.
//! - templates: balanced `{{...}}`, allowing `{{{param}}}` inside.
//!
//! All functions return byte ranges into the scanned text, leftmost first and
//! non-overlapping.

use std::ops::Range;

use lazy_regex::{Lazy, Regex, lazy_regex};

use crate::wikitext::enums::Placeholder;

/// Heading candidate. The closing run is captured separately and compared
/// against the opening run in [`headings`].
static HEADING: Lazy<Regex> = lazy_regex!(r"(?m)^(=+)\s?([^=]+?)\s?(=+)\s*$");

static EXTERNAL_LINK: Lazy<Regex> = lazy_regex!(r"\[[^\[\]]*\]");
static INTERNAL_LINK: Lazy<Regex> = lazy_regex!(r"\[\[.+?\]\][^\s\[]*");
static INTERWIKI_LINK: Lazy<Regex> = lazy_regex!(r"\[\[(en|es|fr):.+?\]\]");
static CATEGORY: Lazy<Regex> = lazy_regex!(r"\[\[(Category|Kategorie):.+?\]\]");
static NOWIKI: Lazy<Regex> = lazy_regex!(r"(?s)<nowiki>.*?</nowiki>");
static NOINCLUDE: Lazy<Regex> = lazy_regex!(r"(?s)<noinclude>.*?</noinclude>");
static INCLUDEONLY: Lazy<Regex> = lazy_regex!(r"(?s)<includeonly>.*?</includeonly>");
static COMMENT: Lazy<Regex> = lazy_regex!(r"(?s)<!--.*?-->");

/// Title segment of a template body: everything up to the first `|` or the
/// end of the first line.
static TEMPLATE_TITLE: Lazy<Regex> = lazy_regex!(r"(?m)^(.+?)($|\|)");

/// A heading line found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Byte offset of the first `=`.
    pub start: usize,
    /// Byte offset just past the closing `=` run.
    pub marker_end: usize,
    /// Byte offset just past the match (trailing whitespace included).
    pub end: usize,
    /// Number of `=` characters on each side.
    pub level: usize,
    /// Text between the markers, minus at most one space on each side.
    pub title: String,
}

/// Every heading line in `text`, in text order.
pub fn headings(text: &str) -> Vec<HeadingMatch> {
    let mut out = Vec::new();
    let mut pos = 0usize;

    while pos <= text.len() {
        let Some(caps) = HEADING.captures_at(text, pos) else {
            break;
        };
        let (Some(whole), Some(open), Some(title), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            break;
        };

        if open.len() == close.len() {
            out.push(HeadingMatch {
                start: whole.start(),
                marker_end: close.end(),
                end: whole.end(),
                level: open.len(),
                title: title.as_str().to_string(),
            });
            pos = whole.end().max(whole.start() + 1);
        } else {
            // `^` can only match again at the next line start.
            match text[whole.start()..].find('\n') {
                Some(nl) => pos = whole.start() + nl + 1,
                None => break,
            }
        }
    }

    out
}

/// The heading that starts at offset 0 of `text`, if any.
pub fn leading_heading(text: &str) -> Option<HeadingMatch> {
    headings(text).into_iter().next().filter(|h| h.start == 0)
}

/// Byte ranges of external links `[url label]`.
pub fn external_links(text: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut pos = 0usize;

    while let Some(m) = EXTERNAL_LINK.find_at(text, pos) {
        let glued_before = text[..m.start()].ends_with('[');
        let glued_after = text[m.end()..].starts_with(']');
        if glued_before || glued_after {
            // part of `[[...]]`; `[` is one byte so this stays on a boundary
            pos = m.start() + 1;
            continue;
        }
        out.push(m.range());
        pos = m.end();
    }

    out
}

/// Byte ranges of balanced templates `{{...}}`, outermost only.
pub fn templates(text: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut pos = 0usize;

    while let Some(off) = text[pos..].find("{{") {
        let start = pos + off;
        match template_end(text, start) {
            Some(end) => {
                out.push(start..end);
                pos = end;
            }
            None => pos = start + 1,
        }
    }

    out
}

/// If a balanced template opens at `start`, return the offset just past its
/// closing `}}`.
///
/// Inside the template only `{{`, `}}` and `{{{param}}}` may contain braces;
/// a lone `{` or `}` makes the attempt fail.
pub fn template_end(text: &str, start: usize) -> Option<usize> {
    if !text.get(start..)?.starts_with("{{") {
        return None;
    }

    let mut idx = start + 2;
    let mut depth = 0usize;

    while idx < text.len() {
        let rest = &text[idx..];
        if rest.starts_with("{{{")
            && let Some(end) = parameter_end(text, idx)
        {
            idx = end;
            continue;
        }
        if rest.starts_with("{{") {
            depth += 1;
            idx += 2;
            continue;
        }
        if rest.starts_with("}}") {
            if depth == 0 {
                return Some(idx + 2);
            }
            depth -= 1;
            idx += 2;
            continue;
        }
        let ch = rest.chars().next()?;
        if ch == '{' || ch == '}' {
            return None;
        }
        idx += ch.len_utf8();
    }

    None
}

/// `{{{name}}}` starting at `start`: non-empty content without `}`.
fn parameter_end(text: &str, start: usize) -> Option<usize> {
    let inner = text.get(start + 3..)?;
    let close = inner.find('}')?;
    if close == 0 || !inner[close..].starts_with("}}}") {
        return None;
    }
    Some(start + 3 + close + 3)
}

/// Byte ranges matched by the pattern of placeholder category `p`.
pub fn find_all(p: Placeholder, text: &str) -> Vec<Range<usize>> {
    let re: &Regex = match p {
        Placeholder::ExternalLink => return external_links(text),
        Placeholder::Template => return templates(text),
        Placeholder::InternalLink => &*INTERNAL_LINK,
        Placeholder::InterwikiLink => &*INTERWIKI_LINK,
        Placeholder::Category => &*CATEGORY,
        Placeholder::Nowiki => &*NOWIKI,
        Placeholder::Noinclude => &*NOINCLUDE,
        Placeholder::Includeonly => &*INCLUDEONLY,
        Placeholder::Comment => &*COMMENT,
    };
    re.find_iter(text).map(|m| m.range()).collect()
}

/// Raw title segment of a template body, trimmed. Empty when the body has
/// no title characters at all.
pub fn template_title(body: &str) -> String {
    TEMPLATE_TITLE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices<'a>(text: &'a str, ranges: &[Range<usize>]) -> Vec<&'a str> {
        ranges.iter().map(|r| &text[r.clone()]).collect()
    }

    #[test]
    fn heading_levels_and_titles() {
        let text = "== History ==\ntext\n=== Early===\n= Top =";
        let hs = headings(text);
        assert_eq!(hs.len(), 3);
        assert_eq!((hs[0].level, hs[0].title.as_str()), (2, "History"));
        assert_eq!((hs[1].level, hs[1].title.as_str()), (3, "Early"));
        assert_eq!((hs[2].level, hs[2].title.as_str()), (1, "Top"));
        assert_eq!(hs[0].start, 0);
        assert_eq!(hs[1].start, text.find("===").unwrap());
    }

    #[test]
    fn heading_with_unbalanced_markers_is_ignored() {
        let text = "== Broken ===\n== Fine ==\n";
        let hs = headings(text);
        assert_eq!(hs.len(), 1);
        assert_eq!(hs[0].title, "Fine");
        assert_eq!(hs[0].start, text.find("== Fine").unwrap());
    }

    #[test]
    fn heading_requires_line_start_and_clean_end() {
        assert!(headings("text == No ==").is_empty());
        assert!(headings("== No == trailing").is_empty());
        assert_eq!(headings("==Tight==   ")[0].title, "Tight");
    }

    #[test]
    fn heading_keeps_extra_spaces_in_title() {
        assert_eq!(headings("==  Wide  ==")[0].title, " Wide ");
    }

    #[test]
    fn leading_heading_only_at_offset_zero() {
        assert!(leading_heading("intro\n== A ==").is_none());
        assert_eq!(leading_heading("== A ==\nbody").unwrap().level, 2);
    }

    #[test]
    fn external_links_skip_wikilinks() {
        let text = "see [http://a.org A] and [[Page]] or [[x]]y [http://b.org]";
        let found = slices(text, &external_links(text));
        assert_eq!(found, vec!["[http://a.org A]", "[http://b.org]"]);
    }

    #[test]
    fn internal_links_take_word_suffix() {
        let text = "[[Apple]]s and [[Pear|pears]] [[x]]";
        let found = slices(text, &find_all(Placeholder::InternalLink, text));
        assert_eq!(found, vec!["[[Apple]]s", "[[Pear|pears]]", "[[x]]"]);
    }

    #[test]
    fn interwiki_and_category() {
        let text = "[[fr:Pomme]] [[de:Apfel]] [[Category:Fruit]] [[Kategorie:Obst]]";
        assert_eq!(
            slices(text, &find_all(Placeholder::InterwikiLink, text)),
            vec!["[[fr:Pomme]]"]
        );
        assert_eq!(
            slices(text, &find_all(Placeholder::Category, text)),
            vec!["[[Category:Fruit]]", "[[Kategorie:Obst]]"]
        );
    }

    #[test]
    fn templates_balance_nested_braces() {
        let text = "a {{Outer|x={{Inner|1}}|y={{{param}}}}} b {{Solo}}";
        let found = slices(text, &templates(text));
        assert_eq!(
            found,
            vec!["{{Outer|x={{Inner|1}}|y={{{param}}}}}", "{{Solo}}"]
        );
    }

    #[test]
    fn templates_unbalanced_is_skipped() {
        let text = "{{Broken|x {{Ok}}";
        assert_eq!(slices(text, &templates(text)), vec!["{{Ok}}"]);
        assert!(templates("{{a}").is_empty());
    }

    #[test]
    fn tags_and_comments_span_lines() {
        let text = "<!-- one\ntwo --> x <nowiki>[[a]]\n</nowiki> <noinclude>n</noinclude>";
        assert_eq!(
            slices(text, &find_all(Placeholder::Comment, text)),
            vec!["<!-- one\ntwo -->"]
        );
        assert_eq!(
            slices(text, &find_all(Placeholder::Nowiki, text)),
            vec!["<nowiki>[[a]]\n</nowiki>"]
        );
        assert_eq!(
            slices(text, &find_all(Placeholder::Noinclude, text)),
            vec!["<noinclude>n</noinclude>"]
        );
        let inc = "<includeonly>a</includeonly><includeonly>b</includeonly>";
        assert_eq!(find_all(Placeholder::Includeonly, inc).len(), 2);
    }

    #[test]
    fn template_title_stops_at_pipe_or_line_end() {
        assert_eq!(template_title(" Infobox |name=x"), "Infobox");
        assert_eq!(template_title("Infobox\n|name=x"), "Infobox");
        assert_eq!(template_title("Stub"), "Stub");
        assert_eq!(template_title(""), "");
    }
}
