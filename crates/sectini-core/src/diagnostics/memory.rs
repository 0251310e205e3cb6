//! In-memory diagnostics sink.
//!
//! Keeps the lines of the most recent parse pass in order, along with the
//! [`Diagnostic`] values they were rendered from.  Used by tests and
//! by callers that want to inspect anomalies programmatically instead of
//! writing a log file.

use std::io;

use super::{Diagnostic, DiagnosticSink};

/// A [`DiagnosticSink`] that stores lines in a `Vec<String>`.
///
/// [`open`](DiagnosticSink::open) clears previous content, matching the
/// truncate-per-pass behaviour of [`super::FileSink`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    closed: bool,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded during the latest pass, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Diagnostics recorded during the latest pass, oldest first.
    ///
    /// Lines written directly with `append_line` have no entry here.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` once the latest pass has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DiagnosticSink for MemorySink {
    fn open(&mut self) -> io::Result<()> {
        self.lines.clear();
        self.diagnostics.clear();
        self.closed = false;
        Ok(())
    }

    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn record(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        self.diagnostics.push(diagnostic.clone());
        self.append_line(&diagnostic.to_string())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
