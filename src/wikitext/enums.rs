//! Enums used by the wikitext module.
//!
//! - `Placeholder` - the categories of fragile markup that can be hidden
//!   behind placeholder tokens.
//! - `PlaceholderSet` - a combinable bit-set of `Placeholder` values.
//!
//! `Placeholder` implements `Display` and `FromStr` so category lists can be
//! written in configuration or tests as plain words.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A kind of markup that can be protected by a placeholder.
///
/// The declaration order is the order categories are applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placeholder {
    /// `[http://example.org label]`
    ExternalLink,
    /// `[[Page|label]]suffix`
    InternalLink,
    /// `[[fr:Page]]`
    InterwikiLink,
    /// `[[Category:Name]]`
    Category,
    /// `{{Name|...}}`
    Template,
    /// `<nowiki>...</nowiki>`
    Nowiki,
    /// `<noinclude>...</noinclude>`
    Noinclude,
    /// `<includeonly>...</includeonly>`
    Includeonly,
    /// `<!-- ... -->`
    Comment,
}

impl Placeholder {
    /// Every category in application order.
    pub const ALL: [Placeholder; 9] = [
        Placeholder::ExternalLink,
        Placeholder::InternalLink,
        Placeholder::InterwikiLink,
        Placeholder::Category,
        Placeholder::Template,
        Placeholder::Nowiki,
        Placeholder::Noinclude,
        Placeholder::Includeonly,
        Placeholder::Comment,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::ExternalLink => write!(f, "ExternalLink"),
            Placeholder::InternalLink => write!(f, "InternalLink"),
            Placeholder::InterwikiLink => write!(f, "InterwikiLink"),
            Placeholder::Category => write!(f, "Category"),
            Placeholder::Template => write!(f, "Template"),
            Placeholder::Nowiki => write!(f, "Nowiki"),
            Placeholder::Noinclude => write!(f, "Noinclude"),
            Placeholder::Includeonly => write!(f, "Includeonly"),
            Placeholder::Comment => write!(f, "Comment"),
        }
    }
}

impl FromStr for Placeholder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "externallink" | "externallinks" | "external" => Ok(Placeholder::ExternalLink),
            "internallink" | "internallinks" | "internal" => Ok(Placeholder::InternalLink),
            "interwikilink" | "interwikilinks" | "interwiki" => Ok(Placeholder::InterwikiLink),
            "category" | "categories" => Ok(Placeholder::Category),
            "template" | "templates" => Ok(Placeholder::Template),
            "nowiki" => Ok(Placeholder::Nowiki),
            "noinclude" => Ok(Placeholder::Noinclude),
            "includeonly" => Ok(Placeholder::Includeonly),
            "comment" | "comments" => Ok(Placeholder::Comment),
            other => Err(format!("unknown Placeholder '{}'", other)),
        }
    }
}

/// Set of placeholder categories.
///
/// Defaults to external links, interwiki links and comments.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderSet(u16);

impl PlaceholderSet {
    /// No category at all; protecting with it changes nothing.
    pub const fn empty() -> Self {
        PlaceholderSet(0)
    }

    /// Every category.
    pub fn all() -> Self {
        Placeholder::ALL.iter().copied().collect()
    }

    pub fn contains(&self, p: Placeholder) -> bool {
        self.0 & p.bit() != 0
    }

    pub fn insert(&mut self, p: Placeholder) {
        self.0 |= p.bit();
    }

    pub fn remove(&mut self, p: Placeholder) {
        self.0 &= !p.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enabled categories in application order.
    pub fn iter(&self) -> impl Iterator<Item = Placeholder> + '_ {
        Placeholder::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Placeholder::ExternalLink | Placeholder::InterwikiLink | Placeholder::Comment
    }
}

impl fmt::Debug for PlaceholderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Placeholder> for PlaceholderSet {
    fn from(p: Placeholder) -> Self {
        PlaceholderSet(p.bit())
    }
}

impl FromIterator<Placeholder> for PlaceholderSet {
    fn from_iter<I: IntoIterator<Item = Placeholder>>(iter: I) -> Self {
        let mut set = PlaceholderSet::empty();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl BitOr for Placeholder {
    type Output = PlaceholderSet;
    fn bitor(self, rhs: Placeholder) -> PlaceholderSet {
        PlaceholderSet(self.bit() | rhs.bit())
    }
}

impl BitOr<Placeholder> for PlaceholderSet {
    type Output = PlaceholderSet;
    fn bitor(self, rhs: Placeholder) -> PlaceholderSet {
        PlaceholderSet(self.0 | rhs.bit())
    }
}

impl BitOr for PlaceholderSet {
    type Output = PlaceholderSet;
    fn bitor(self, rhs: PlaceholderSet) -> PlaceholderSet {
        PlaceholderSet(self.0 | rhs.0)
    }
}

impl BitOrAssign<Placeholder> for PlaceholderSet {
    fn bitor_assign(&mut self, rhs: Placeholder) {
        self.insert(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_fromstr_and_display() {
        assert_eq!(
            Placeholder::from_str("templates").unwrap(),
            Placeholder::Template
        );
        assert_eq!(
            Placeholder::from_str("ExternalLink").unwrap(),
            Placeholder::ExternalLink
        );
        assert!(Placeholder::from_str("bold").is_err());
        assert_eq!(format!("{}", Placeholder::Nowiki), "Nowiki");
    }

    #[test]
    fn default_set_matches_documented_subset() {
        let set = PlaceholderSet::default();
        assert!(set.contains(Placeholder::ExternalLink));
        assert!(set.contains(Placeholder::InterwikiLink));
        assert!(set.contains(Placeholder::Comment));
        assert!(!set.contains(Placeholder::Template));
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn iteration_follows_application_order() {
        let set = Placeholder::Comment | Placeholder::Template | Placeholder::ExternalLink;
        let order: Vec<Placeholder> = set.iter().collect();
        assert_eq!(
            order,
            vec![
                Placeholder::ExternalLink,
                Placeholder::Template,
                Placeholder::Comment
            ]
        );
    }

    #[test]
    fn insert_remove_and_all() {
        let mut set = PlaceholderSet::empty();
        assert!(set.is_empty());
        set |= Placeholder::Nowiki;
        assert!(set.contains(Placeholder::Nowiki));
        set.remove(Placeholder::Nowiki);
        assert!(set.is_empty());
        assert_eq!(PlaceholderSet::all().iter().count(), 9);
    }
}
