//! Ordered template parameters.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Template parameters in insertion order.
///
/// Behaves like an insertion-ordered dictionary: inserting an existing key
/// overwrites its value but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite. Returns the previous value.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Rebuild the map in order with `old_key` renamed to `new_key`.
    ///
    /// Nothing changes when `old_key` is absent. When `new_key` already names
    /// another entry, whichever of the two comes later in the old order
    /// supplies the value, at the position of the earlier one.
    pub fn rename(&mut self, old_key: &str, new_key: &str) {
        if !self.contains_key(old_key) {
            return;
        }
        let mut rebuilt = Parameters::new();
        for (k, v) in self.entries.drain(..) {
            if k == old_key {
                rebuilt.insert(new_key, v);
            } else {
                rebuilt.insert(k, v);
            }
        }
        *self = rebuilt;
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter().map(|(k, v)| format!("{}: {}", k, v)).join(", ")
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Parameters {
        [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect()
    }

    #[test]
    fn insert_keeps_first_position() {
        let mut p = abc();
        assert_eq!(p.insert("a", "9"), Some("1".to_string()));
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(p.get("a"), Some("9"));
    }

    #[test]
    fn rename_preserves_order() {
        let mut p = abc();
        p.rename("b", "x");
        let got: Vec<(&str, &str)> = p.iter().collect();
        assert_eq!(got, vec![("a", "1"), ("x", "2"), ("c", "3")]);
    }

    #[test]
    fn rename_missing_key_is_noop() {
        let mut p = abc();
        p.rename("zz", "x");
        assert_eq!(p, abc());
    }

    #[test]
    fn rename_collision_later_entry_wins() {
        let mut p = abc();
        p.rename("a", "c");
        let got: Vec<(&str, &str)> = p.iter().collect();
        assert_eq!(got, vec![("c", "3"), ("b", "2")]);

        let mut p = abc();
        p.rename("c", "a");
        let got: Vec<(&str, &str)> = p.iter().collect();
        assert_eq!(got, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn display_lists_pairs() {
        assert_eq!(format!("{}", abc()), "{a: 1, b: 2, c: 3}");
    }
}
