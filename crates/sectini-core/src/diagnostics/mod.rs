//! Parse diagnostics and the sinks that receive them.
//!
//! A [`Diagnostic`] is a human-readable record of something odd the parser
//! saw: a duplicate key, a duplicate section, a header it could not read.
//! Diagnostics never change how a document is parsed; they only report.
//!
//! # Sinks
//!
//! The parser does not own any log file.  Instead it writes through the
//! [`DiagnosticSink`] trait, which the caller supplies:
//!
//! - [`NullSink`] – diagnostics disabled.
//! - [`MemorySink`] – keeps lines in a `Vec<String>` (tests, `check` command).
//! - [`FileSink`] – one log file per source, truncated at the start of every
//!   parse pass.
//!
//! Each parse pass calls [`DiagnosticSink::open`] exactly once, then
//! [`DiagnosticSink::append_line`] once per diagnostic, then
//! [`DiagnosticSink::close`] exactly once, even when nothing was reported.
//!
//! Sink failures are logged with `tracing` and otherwise ignored.

use std::fmt;
use std::io;

use tracing::{debug, warn};

pub mod file;
pub mod memory;

pub use file::FileSink;
pub use memory::MemorySink;

/// One event recorded during a parse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A parse pass over `source` began.
    LoadStart { source: String },
    /// A parse pass over `source` finished.
    LoadComplete { source: String },
    /// `key` appeared more than once under `section`; the first value was kept.
    DuplicateKey { section: String, key: String },
    /// A header named `section` appeared more than once; the later block was dropped.
    DuplicateSection { section: String },
    /// No `[name]` could be extracted from `header`; its entries were dropped.
    MalformedHeader { header: String },
    /// The requested source file does not exist.
    SourceMissing { path: String },
}

impl Diagnostic {
    /// Returns `true` for the structural anomalies, `false` for the
    /// load start/complete markers.
    pub fn is_anomaly(&self) -> bool {
        !matches!(
            self,
            Diagnostic::LoadStart { .. } | Diagnostic::LoadComplete { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LoadStart { source } => write!(f, "load start: {source}"),
            Diagnostic::LoadComplete { source } => write!(f, "load complete: {source}"),
            Diagnostic::DuplicateKey { section, key } => {
                write!(f, "duplicate key found: {section} - {key}")
            }
            Diagnostic::DuplicateSection { section } => {
                write!(f, "duplicate section found: {section}")
            }
            Diagnostic::MalformedHeader { header } => {
                write!(f, "unknown error with title: {header}")
            }
            Diagnostic::SourceMissing { path } => write!(f, "source does not exist: {path}"),
        }
    }
}

/// Destination for diagnostic lines.
///
/// Only [`append_line`](DiagnosticSink::append_line) is required; the
/// default `open`/`close` do nothing and the default
/// [`record`](DiagnosticSink::record) renders the diagnostic as one line.
pub trait DiagnosticSink {
    /// Prepares the sink for a new parse pass, discarding earlier content.
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Appends one line.  `line` carries no terminator.
    fn append_line(&mut self, line: &str) -> io::Result<()>;

    /// Receives one diagnostic of the current pass.
    ///
    /// Override to keep the structured value as well as its text.
    fn record(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        self.append_line(&diagnostic.to_string())
    }

    /// Ends the current pass and releases any held resources.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn append_line(&mut self, line: &str) -> io::Result<()> {
        (**self).append_line(line)
    }

    fn record(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        (**self).record(diagnostic)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Sink that discards everything.  Used when diagnostics are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn append_line(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// One open/append/close cycle over a sink.
///
/// The sink is closed when the pass is dropped, so every exit path from a
/// parse closes it exactly once.
pub(crate) struct DiagnosticPass<'a, S: DiagnosticSink + ?Sized> {
    sink: &'a mut S,
    opened: bool,
}

impl<'a, S: DiagnosticSink + ?Sized> DiagnosticPass<'a, S> {
    /// Opens `sink` for a new pass.
    pub(crate) fn begin(sink: &'a mut S) -> Self {
        let opened = match sink.open() {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to open diagnostics sink: {e}");
                false
            }
        };
        Self { sink, opened }
    }

    /// Mirrors `diagnostic` to `tracing` and appends it to the sink.
    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_anomaly() {
            warn!("{diagnostic}");
        } else {
            debug!("{diagnostic}");
        }

        if !self.opened {
            return;
        }
        if let Err(e) = self.sink.record(&diagnostic) {
            warn!("failed to write diagnostic line: {e}");
        }
    }
}

impl<S: DiagnosticSink + ?Sized> Drop for DiagnosticPass<'_, S> {
    fn drop(&mut self) {
        if !self.opened {
            return;
        }
        if let Err(e) = self.sink.close() {
            warn!("failed to close diagnostics sink: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
