//! Section accumulator: the single-pass state machine that builds a
//! [`ConfigDocument`].
//!
//! # States
//!
//! ```text
//!                 header H
//!   NoSection ───────────────► InSection { header: H, pending: {} }
//!      │  ▲                        │   │
//!      │  └─ candidate: dropped    │   └─ candidate `k=v`: insert (first wins)
//!      │                           │
//!      └─ comment/blank: ignored   └─ header H2:
//!                                       pending non-empty → flush(H, pending)
//!                                       then InSection { header: H2, pending: {} }
//! ```
//!
//! At end of input a non-empty pending map is flushed the same way.
//!
//! A section is only inserted into the document once it is complete, and
//! only if it holds at least one entry, so a header with nothing under it
//! never creates a section.
//!
//! # Flushing
//!
//! 1. Extract the name with the `[name]` pattern.  On failure the whole
//!    pending map is dropped and [`Diagnostic::MalformedHeader`] is reported.
//! 2. If the name already exists the earlier section is kept and
//!    [`Diagnostic::DuplicateSection`] is reported.
//! 3. Otherwise the section is inserted.
//!
//! Candidate lines that are not a valid `key=value` (no `=`, empty key or
//! value) are dropped without a diagnostic.

use crate::diagnostics::{Diagnostic, DiagnosticPass, DiagnosticSink};
use crate::domain::document::{ConfigDocument, SectionMap};
use crate::parse::line::{classify, section_name, split_entry, LineKind};

/// Label used for documents parsed from in-memory text.
pub const MEMORY_SOURCE: &str = "<memory>";

/// Parser state between two lines.
#[derive(Debug)]
enum State {
    /// No header seen yet.
    NoSection,
    /// Entries accumulate under `header` (raw bracketed text).
    InSection { header: String, pending: SectionMap },
}

/// Incremental builder fed one raw line at a time.
///
/// Every call returns at most one diagnostic, because each line can trigger
/// at most one anomaly.
///
/// # Example
///
/// ```rust
/// use sectini_core::parse::SectionAccumulator;
///
/// let mut acc = SectionAccumulator::new();
/// for line in ["[net]", "port=80", "port=81"] {
///     if let Some(d) = acc.feed(line) {
///         println!("{d}");
///     }
/// }
/// let (doc, _) = acc.finish();
/// assert_eq!(doc.get("net", "port"), Some("80"));
/// ```
#[derive(Debug)]
pub struct SectionAccumulator {
    document: ConfigDocument,
    state: State,
}

impl SectionAccumulator {
    /// Creates an accumulator with an empty document in the `NoSection` state.
    pub fn new() -> Self {
        Self {
            document: ConfigDocument::new(),
            state: State::NoSection,
        }
    }

    /// Processes one raw input line.
    pub fn feed(&mut self, raw: &str) -> Option<Diagnostic> {
        match classify(raw) {
            LineKind::Blank | LineKind::Comment => None,
            LineKind::SectionHeader(header) => self.on_header(header.into_owned()),
            LineKind::Candidate(candidate) => self.on_candidate(&candidate),
        }
    }

    /// Flushes any pending section and returns the finished document.
    pub fn finish(mut self) -> (ConfigDocument, Option<Diagnostic>) {
        let diagnostic = match std::mem::replace(&mut self.state, State::NoSection) {
            State::InSection { header, pending } if !pending.is_empty() => {
                self.flush(header, pending)
            }
            _ => None,
        };
        (self.document, diagnostic)
    }

    fn on_header(&mut self, header: String) -> Option<Diagnostic> {
        let previous = std::mem::replace(
            &mut self.state,
            State::InSection {
                header,
                pending: SectionMap::new(),
            },
        );
        match previous {
            State::InSection { header, pending } if !pending.is_empty() => {
                self.flush(header, pending)
            }
            // No previous header, or one with nothing under it: its text is
            // simply forgotten.
            _ => None,
        }
    }

    fn on_candidate(&mut self, candidate: &str) -> Option<Diagnostic> {
        let State::InSection { header, pending } = &mut self.state else {
            return None;
        };
        let (key, value) = split_entry(candidate)?;
        if pending.insert_first(key, value) {
            return None;
        }
        Some(Diagnostic::DuplicateKey {
            section: section_name(header.as_str())
                .unwrap_or(header.as_str())
                .to_string(),
            key: key.to_string(),
        })
    }

    fn flush(&mut self, header: String, pending: SectionMap) -> Option<Diagnostic> {
        let Some(name) = section_name(&header).map(str::to_owned) else {
            return Some(Diagnostic::MalformedHeader { header });
        };
        if self.document.insert_section(&name, pending) {
            None
        } else {
            Some(Diagnostic::DuplicateSection { section: name })
        }
    }
}

impl Default for SectionAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses in-memory `text` in one pass, reporting to `sink`.
///
/// Equivalent to [`parse_labeled`] with the label `"<memory>"`.
pub fn parse_document<S: DiagnosticSink + ?Sized>(text: &str, sink: &mut S) -> ConfigDocument {
    parse_labeled(MEMORY_SOURCE, text, sink)
}

/// Parses `text` in one pass, reporting to `sink` under the name `source`.
///
/// The sink is opened once, receives a load-start marker, every anomaly in
/// input order, and a load-complete marker, and is then closed.  A leading
/// UTF-8 byte-order mark is ignored.  Both `\n` and `\r\n` line endings are
/// accepted.
pub fn parse_labeled<S: DiagnosticSink + ?Sized>(
    source: &str,
    text: &str,
    sink: &mut S,
) -> ConfigDocument {
    let mut pass = DiagnosticPass::begin(sink);
    pass.emit(Diagnostic::LoadStart {
        source: source.to_string(),
    });

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut acc = SectionAccumulator::new();
    for line in text.lines() {
        if let Some(d) = acc.feed(line) {
            pass.emit(d);
        }
    }
    let (document, last) = acc.finish();
    if let Some(d) = last {
        pass.emit(d);
    }

    pass.emit(Diagnostic::LoadComplete {
        source: source.to_string(),
    });
    document
}

// ── Tests ─────────────────────────────────────────────────────────────────────
