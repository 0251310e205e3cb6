//! The parsed configuration document.
//!
//! [`ConfigDocument`] maps case-sensitive section names to [`SectionMap`]s,
//! which in turn map case-sensitive keys to raw (trimmed, uncoerced) string
//! values.  Both maps preserve first-seen order so that dumps are stable and
//! match the source file.
//!
//! A document is only ever built by the parser, one fully accumulated section
//! at a time.  Callers get read-only access.

use std::collections::HashMap;

/// Key → raw value entries belonging to one section.
///
/// Keys are unique; inserting a key that is already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
    /// Key → position in `entries`.
    index: HashMap<String, usize>,
}

impl SectionMap {
    /// Creates an empty section map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key = value` unless `key` is already present.
    ///
    /// Returns `true` when the entry was inserted, `false` when an existing
    /// value was kept.
    pub fn insert_first(&mut self, key: &str, value: &str) -> bool {
        if self.index.contains_key(key) {
            return false;
        }
        self.index.insert(key.to_string(), self.entries.len());
        self.entries.push((key.to_string(), value.to_string()));
        true
    }

    /// Returns the raw value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Returns `true` if `key` has a value in this section.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the section has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Section name → [`SectionMap`] store produced by one full parse.
///
/// # Example
///
/// ```rust
/// use sectini_core::{parse_document, NullSink};
///
/// let doc = parse_document("[a]\nx=1\n[b]\ny=2\n", &mut NullSink);
/// assert_eq!(doc.get("a", "x"), Some("1"));
/// assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<(String, SectionMap)>,
    /// Section name → position in `sections`.
    index: HashMap<String, usize>,
}

impl ConfigDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a completed section unless a section with the same name exists.
    ///
    /// Returns `true` when inserted, `false` when the existing section was kept
    /// and `map` was dropped.
    pub(crate) fn insert_section(&mut self, name: &str, map: SectionMap) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.sections.len());
        self.sections.push((name.to_string(), map));
        true
    }

    /// Returns the section called `name`, if any.
    pub fn section(&self, name: &str) -> Option<&SectionMap> {
        self.index.get(name).map(|&i| &self.sections[i].1)
    }

    /// Returns `true` if a section called `name` exists.
    pub fn contains_section(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Looks up `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Section names in first-seen order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, section)` pairs in first-seen order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &SectionMap)> {
        self.sections.iter().map(|(name, map)| (name.as_str(), map))
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if the document holds no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
