//! Template body parsing and formatting helpers.
//!
//! These back the default [`Site`](crate::wikitext::site::Site) collaborator:
//! enumerating top-level template bodies, splitting a body into ordered
//! parameters and writing `(title, parameters)` back as wikitext.
//!
//! Splitting is top-level aware: `|` and `=` characters inside nested
//! `{{ }}`, `[[ ]]` or `<...>` tags are ignored.

use itertools::Itertools;

use crate::wikitext::parameters::Parameters;
use crate::wikitext::patterns;

/// Bodies (without the outer braces) of every top-level template in `text`,
/// in text order.
pub fn template_bodies(text: &str) -> Vec<String> {
    patterns::templates(text)
        .into_iter()
        .map(|r| text[r.start + 2..r.end - 2].to_string())
        .collect()
}

/// Parse a template body into ordered parameters.
///
/// The first top-level segment is the title and is skipped. `name=value`
/// segments become named entries with both sides trimmed; other segments are
/// numbered `1`, `2`, ... in order and keep their whitespace. A later
/// duplicate key overwrites the earlier value.
pub fn parse_parameters(body: &str) -> Parameters {
    let mut params = Parameters::new();
    let mut position = 0usize;

    for part in split_top_level(body, '|').into_iter().skip(1) {
        if let Some(eq_pos) = find_top_level_char(&part, '=') {
            let (name, value) = part.split_at(eq_pos);
            params.insert(name.trim(), value[1..].trim());
        } else {
            position += 1;
            params.insert(position.to_string(), part);
        }
    }

    params
}

/// Write a template back as `{{title|...}}`.
///
/// Numeric keys that continue the positional sequence are written bare unless
/// their value contains `=`. When `original` spans several lines the result
/// puts every parameter on its own line and closes on a new line.
pub fn format_template(title: &str, params: &Parameters, original: &str) -> String {
    let multiline = original.contains('\n');
    let mut next_position = 1usize;

    let parts = params
        .iter()
        .map(|(key, value)| {
            if key == next_position.to_string() && !value.contains('=') {
                next_position += 1;
                value.to_string()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect_vec();

    let mut out = String::from("{{");
    out.push_str(title);
    if multiline {
        for part in &parts {
            out.push_str("\n|");
            // positional values keep the line break they were parsed with
            out.push_str(part.trim_end_matches('\n'));
        }
        out.push('\n');
    } else {
        for part in &parts {
            out.push('|');
            out.push_str(part);
        }
    }
    out.push_str("}}");
    out
}

/// Split by `sep` only at top level (not inside nested {{ }}, [[ ]], or <...> tags).
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut cur = String::new();

    let chs: Vec<char> = s.chars().collect();
    let n = chs.len();
    let mut i = 0usize;
    let mut depth_brace = 0usize;
    let mut depth_bracket = 0usize;
    let mut in_tag = false;

    while i < n {
        let ch = chs[i];
        let next = chs.get(i + 1).copied();
        match (ch, next) {
            ('{', Some('{')) => {
                depth_brace += 1;
                cur.push_str("{{");
                i += 2;
                continue;
            }
            ('}', Some('}')) => {
                depth_brace = depth_brace.saturating_sub(1);
                cur.push_str("}}");
                i += 2;
                continue;
            }
            ('[', Some('[')) => {
                depth_bracket += 1;
                cur.push_str("[[");
                i += 2;
                continue;
            }
            (']', Some(']')) => {
                depth_bracket = depth_bracket.saturating_sub(1);
                cur.push_str("]]");
                i += 2;
                continue;
            }
            ('<', _) => in_tag = true,
            ('>', _) => in_tag = false,
            _ => {}
        }

        if ch == sep && depth_brace == 0 && depth_bracket == 0 && !in_tag {
            parts.push(std::mem::take(&mut cur));
        } else {
            cur.push(ch);
        }
        i += 1;
    }

    parts.push(cur);
    parts
}

/// Byte index of the first top-level occurrence of `c` in `s`.
pub fn find_top_level_char(s: &str, c: char) -> Option<usize> {
    let chs: Vec<(usize, char)> = s.char_indices().collect();
    let n = chs.len();
    let mut i = 0usize;
    let mut depth_brace = 0usize;
    let mut depth_bracket = 0usize;
    let mut in_tag = false;

    while i < n {
        let (byte_pos, ch) = chs[i];
        let next = chs.get(i + 1).map(|(_, c)| *c);
        match (ch, next) {
            ('{', Some('{')) => {
                depth_brace += 1;
                i += 2;
                continue;
            }
            ('}', Some('}')) => {
                depth_brace = depth_brace.saturating_sub(1);
                i += 2;
                continue;
            }
            ('[', Some('[')) => {
                depth_bracket += 1;
                i += 2;
                continue;
            }
            (']', Some(']')) => {
                depth_bracket = depth_bracket.saturating_sub(1);
                i += 2;
                continue;
            }
            ('<', _) => in_tag = true,
            ('>', _) => in_tag = false,
            _ => {}
        }

        if ch == c && depth_brace == 0 && depth_bracket == 0 && !in_tag {
            return Some(byte_pos);
        }
        i += 1;
    }
    None
}
