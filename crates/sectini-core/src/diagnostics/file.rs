//! File-backed diagnostics sink.
//!
//! One log file per configuration source.  The path is usually derived from
//! the source name with [`FileSink::for_source`]:
//!
//! ```text
//! source:  conf/sp2.ini
//! log dir: log/
//! log:     log/sp2.ini.log
//! ```
//!
//! The file is created (and truncated) when a parse pass opens the sink and
//! flushed and closed when the pass ends, so no file handle outlives a pass.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::DiagnosticSink;

/// Suffix appended to the source file name to form the log file name.
pub const LOG_SUFFIX: &str = ".log";

/// A [`DiagnosticSink`] that writes one line per diagnostic to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Creates a sink writing to `path`.  Nothing is touched on disk until
    /// the first pass opens the sink.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    /// Creates a sink for `source` inside `log_dir`, named
    /// `<source file name>.log`.
    ///
    /// ```rust
    /// use std::path::Path;
    /// use sectini_core::FileSink;
    ///
    /// let sink = FileSink::for_source("conf/sp2.ini", "log");
    /// assert_eq!(sink.path(), Path::new("log/sp2.ini.log"));
    /// ```
    pub fn for_source(source: impl AsRef<Path>, log_dir: impl AsRef<Path>) -> Self {
        let mut name = source
            .as_ref()
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config".into());
        name.push(LOG_SUFFIX);
        Self::new(log_dir.as_ref().join(name))
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticSink for FileSink {
    fn open(&mut self) -> io::Result<()> {
        // Drop any writer left over from a pass that was never closed.
        self.writer = None;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        self.writer = Some(BufWriter::new(File::create(&self.path)?));
        Ok(())
    }

    fn append_line(&mut self, line: &str) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => writeln!(w, "{line}"),
            None => Err(io::Error::other(format!(
                "diagnostics log {} is not open",
                self.path.display()
            ))),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
