//! Line classifier.
//!
//! Every raw input line is normalised (outer whitespace trimmed, tab
//! characters removed) and then sorted into one of four kinds:
//!
//! | Normalised line     | Kind                       |
//! |---------------------|----------------------------|
//! | empty               | [`LineKind::Blank`]        |
//! | starts with `;`     | [`LineKind::Comment`]      |
//! | starts with `[`     | [`LineKind::SectionHeader`]|
//! | anything else       | [`LineKind::Candidate`]    |
//!
//! Classification never fails.  Whether a candidate really is a `key=value`
//! entry is decided later by [`split_entry`].

use std::borrow::Cow;

/// Classification of a single normalised input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Nothing left after normalisation.
    Blank,
    /// A `;` comment.  The whole line is ignored.
    Comment,
    /// A header line, carrying the raw bracketed text (e.g. `"[connect]"`).
    SectionHeader(Cow<'a, str>),
    /// Any other text; possibly a `key=value` entry.
    Candidate(Cow<'a, str>),
}

/// Normalises and classifies one raw line.
///
/// # Examples
///
/// ```rust
/// use sectini_core::parse::line::{classify, LineKind};
///
/// assert_eq!(classify("   "), LineKind::Blank);
/// assert_eq!(classify(";disabled=1"), LineKind::Comment);
/// assert!(matches!(classify("[connect]"), LineKind::SectionHeader(_)));
/// assert!(matches!(classify("port=9000"), LineKind::Candidate(_)));
/// ```
pub fn classify(raw: &str) -> LineKind<'_> {
    let line = normalize(raw);

    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with(';') {
        LineKind::Comment
    } else if line.starts_with('[') {
        LineKind::SectionHeader(line)
    } else {
        LineKind::Candidate(line)
    }
}

/// Trims outer whitespace and removes every embedded tab.
///
/// Borrows when the line holds no tabs, which is the common case.
fn normalize(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    if trimmed.contains('\t') {
        Cow::Owned(trimmed.replace('\t', ""))
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Splits a candidate line into a `(key, value)` pair.
///
/// The split happens on the first `=`; both halves are trimmed.  Returns
/// `None` when there is no `=` or when either half is empty after trimming.
///
/// ```rust
/// use sectini_core::parse::line::split_entry;
///
/// assert_eq!(split_entry("port = 9000"), Some(("port", "9000")));
/// assert_eq!(split_entry("url=a=b"), Some(("url", "a=b")));
/// assert_eq!(split_entry("novalue="), None);
/// ```
pub fn split_entry(candidate: &str) -> Option<(&str, &str)> {
    let (key, value) = candidate.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Extracts the section name from header text using the `[name]` pattern.
///
/// The name is everything between the first `[` and the first `]` after it,
/// and must contain at least one character.  Text after the closing bracket
/// is ignored.  The name is not trimmed.
///
/// ```rust
/// use sectini_core::parse::line::section_name;
///
/// assert_eq!(section_name("[connect]"), Some("connect"));
/// assert_eq!(section_name("[a]b]"), Some("a"));
/// assert_eq!(section_name("[]"), None);
/// assert_eq!(section_name("[unterminated"), None);
/// ```
pub fn section_name(header: &str) -> Option<&str> {
    let open = header.find('[')?;
    let rest = &header[open + 1..];
    // At least one character is required, and that character may itself be
    // `]`, so the search for the closing bracket starts after it.
    let first = rest.chars().next()?;
    let close = rest[first.len_utf8()..].find(']')? + first.len_utf8();
    Some(&rest[..close])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
