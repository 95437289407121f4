//! Nickname aliases for first-name matching.

use std::collections::{BTreeSet, HashMap};

const DEFAULT_NICKNAMES: &[(&str, &[&str])] = &[
    ("jonathan", &["jon", "john"]),
    ("william", &["bill", "will"]),
    ("robert", &["bob"]),
    ("michael", &["mike"]),
    ("katherine", &["kate", "kathy"]),
];

/// Maps the first name a user types to the given names it may appear as in
/// the address book. Lookup only goes one way: key is the searched name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicknameMap {
    entries: HashMap<String, BTreeSet<String>>,
}

impl NicknameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in alias table.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        for (name, aliases) in DEFAULT_NICKNAMES {
            map.insert(name, aliases.iter().copied());
        }
        map
    }

    /// Adds aliases under `name`. Both sides are stored trimmed and lowercased.
    pub fn insert<I, S>(&mut self, name: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = normalize(name);
        let set = self.entries.entry(key).or_default();
        for alias in aliases {
            let alias = normalize(alias.as_ref());
            if !alias.is_empty() {
                set.insert(alias);
            }
        }
    }

    /// Merges another table over this one, extending alias sets.
    pub fn extend_from(&mut self, other: &HashMap<String, Vec<String>>) {
        for (name, aliases) in other {
            self.insert(name, aliases);
        }
    }

    /// True when `candidate` is listed under `searched`. Both must already be
    /// normalized.
    pub fn is_alias(&self, searched: &str, candidate: &str) -> bool {
        self.entries.get(searched).is_some_and(|aliases| aliases.contains(candidate))
    }

    pub fn aliases(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_loaded() {
        let map = NicknameMap::with_defaults();
        assert_eq!(map.len(), 5);
        assert!(map.is_alias("william", "bill"));
        assert!(map.is_alias("katherine", "kathy"));
        assert!(!map.is_alias("bill", "william"));
    }

    #[test]
    fn test_insert_normalizes() {
        let mut map = NicknameMap::new();
        map.insert("  Elizabeth ", ["Liz", " BETH ", ""]);
        let aliases = map.aliases("elizabeth").unwrap();
        assert_eq!(aliases.len(), 2);
        assert!(map.is_alias("elizabeth", "liz"));
        assert!(map.is_alias("elizabeth", "beth"));
    }

    #[test]
    fn test_extend_from_merges() {
        let mut map = NicknameMap::with_defaults();
        let mut extra = HashMap::new();
        extra.insert("Robert".to_string(), vec!["Rob".to_string(), "Bobby".to_string()]);
        map.extend_from(&extra);
        assert!(map.is_alias("robert", "bob"));
        assert!(map.is_alias("robert", "rob"));
        assert!(map.is_alias("robert", "bobby"));
    }
}
