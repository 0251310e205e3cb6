//! The configuration loader: backing source, parsed document, selected
//! section, and diagnostics sink in one place.
//!
//! # Lifecycle
//!
//! ```text
//! IniLoader::open(path, sink)   parse once; missing file → empty document
//!   select_section("connect")   remember a section name (need not exist)
//!   load_string / load_int / …  look up key in that section, coerce, default
//!   write_value(key, value)     append `key=value` to the file (no re-parse)
//!   reload()                    rebuild the document from the file
//!   set_source(other)           switch files, clear the selection, rebuild
//! ```
//!
//! The selected section is stored by name and looked up again on every
//! query, so it stays valid across `reload()`.
//!
//! # Failure policy
//!
//! A missing source is not an error: the document is left empty and a
//! [`Diagnostic::SourceMissing`] is recorded.  Structural problems in the
//! file are only reported as diagnostics.  The only errors returned are I/O
//! failures reading or appending to a source that does exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticPass, DiagnosticSink, NullSink};
use crate::domain::document::ConfigDocument;
use crate::parse::accumulator::{parse_document, parse_labeled};

pub mod append;
pub mod typed;

/// Error type for loader I/O.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The source exists but could not be read.
    #[error("I/O error reading config source {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source could not be opened for appending or the write failed.
    #[error("I/O error appending to config source {}: {source}", path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Section-scoped configuration loader.
///
/// `S` is the diagnostics sink; the default [`NullSink`] disables
/// diagnostics.
///
/// # Example
///
/// ```rust
/// use sectini_core::{IniLoader, MemorySink};
///
/// let text = "[connect]\nport=9000\n[connect]\nport=1\n";
/// let mut loader = IniLoader::from_text(text, MemorySink::new());
/// loader.select_section("connect");
/// assert_eq!(loader.load_int("port", 0), 9000);
/// assert!(loader
///     .sink()
///     .lines()
///     .iter()
///     .any(|l| l == "duplicate section found: connect"));
/// ```
#[derive(Debug)]
pub struct IniLoader<S: DiagnosticSink = NullSink> {
    source: Option<PathBuf>,
    current_section: String,
    document: ConfigDocument,
    sink: S,
}

impl<S: DiagnosticSink> IniLoader<S> {
    /// Creates a loader with no source and an empty document.
    pub fn new(sink: S) -> Self {
        Self {
            source: None,
            current_section: String::new(),
            document: ConfigDocument::new(),
            sink,
        }
    }

    /// Creates a loader backed by `path` and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Read`] if `path` exists but cannot be read.  A
    /// missing file is not an error.
    pub fn open(path: impl Into<PathBuf>, sink: S) -> Result<Self, LoaderError> {
        let mut loader = Self::new(sink);
        loader.set_source(path)?;
        Ok(loader)
    }

    /// Creates a loader over in-memory text.  There is no backing source, so
    /// [`write_value`](Self::write_value) is a no-op and
    /// [`reload`](Self::reload) does nothing.
    pub fn from_text(text: &str, mut sink: S) -> Self {
        let document = parse_document(text, &mut sink);
        Self {
            source: None,
            current_section: String::new(),
            document,
            sink,
        }
    }

    /// Switches to a new backing source, clears the selected section, and
    /// rebuilds the document from it.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Read`] if `path` exists but cannot be read.  The
    /// document is empty afterwards in that case.
    pub fn set_source(&mut self, path: impl Into<PathBuf>) -> Result<(), LoaderError> {
        self.source = Some(path.into());
        self.current_section.clear();
        self.load()
    }

    /// Rebuilds the document from the current source.  The selected section
    /// is kept.  Does nothing when there is no source.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Read`] if the source exists but cannot be read.
    pub fn reload(&mut self) -> Result<(), LoaderError> {
        if self.source.is_none() {
            return Ok(());
        }
        self.load()
    }

    fn load(&mut self) -> Result<(), LoaderError> {
        self.document = ConfigDocument::new();
        let Some(path) = self.source.as_deref() else {
            return Ok(());
        };

        match fs::read(path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                self.document = parse_labeled(&path.display().to_string(), &text, &mut self.sink);
                debug!(
                    "loaded {} section(s) from {}",
                    self.document.len(),
                    path.display()
                );
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let mut pass = DiagnosticPass::begin(&mut self.sink);
                pass.emit(Diagnostic::SourceMissing {
                    path: path.display().to_string(),
                });
                Ok(())
            }
            Err(source) => Err(LoaderError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// The backing source, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The parsed document.
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// The diagnostics sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the loader and returns its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Selects the section that subsequent lookups and appends refer to.
    ///
    /// The section does not have to exist; lookups then find nothing.  An
    /// empty name clears the selection.
    pub fn select_section(&mut self, name: impl Into<String>) {
        self.current_section = name.into();
    }

    /// The selected section name, or `None` when nothing is selected.
    pub fn current_section(&self) -> Option<&str> {
        Some(self.current_section.as_str()).filter(|s| !s.is_empty())
    }

    /// Raw value of `key` in the selected section.
    ///
    /// `None` when no section is selected, the section does not exist, or the
    /// key is absent.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.document.get(self.current_section()?, key)
    }

    /// String value of `key`, or `default`.
    pub fn load_string(&self, key: &str, default: &str) -> String {
        typed::coerce_string(self.raw(key), default)
    }

    /// Integer value of `key`, or `default` when absent or not an integer.
    pub fn load_int(&self, key: &str, default: i64) -> i64 {
        typed::coerce_int(self.raw(key), default)
    }

    /// Float value of `key`, or `default` when absent, not a number, or not
    /// finite.
    pub fn load_float(&self, key: &str, default: f64) -> f64 {
        typed::coerce_float(self.raw(key), default)
    }

    /// `true` if the raw value of `key` is exactly `"1"`, `false` for any
    /// other value, `default` when absent.
    pub fn load_bool(&self, key: &str, default: bool) -> bool {
        typed::coerce_bool(self.raw(key), default)
    }

    /// Value of `key` parsed with [`std::str::FromStr`], or `default`.
    pub fn load_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        typed::coerce_parsed(self.raw(key), default)
    }

    /// Appends `key=value` to the end of the backing source.
    ///
    /// Does nothing when there is no source or no section is selected.  The
    /// in-memory document is not updated until the next
    /// [`reload`](Self::reload), and the line joins whichever section is last
    /// in the file, not necessarily the selected one (see [`append`]).
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Append`] if the file cannot be opened or written.
    pub fn write_value(&self, key: &str, value: &str) -> Result<(), LoaderError> {
        let Some(path) = self.source().filter(|p| !p.as_os_str().is_empty()) else {
            debug!("write_value({key}) skipped: no source");
            return Ok(());
        };
        let Some(section) = self.current_section() else {
            debug!("write_value({key}) skipped: no section selected");
            return Ok(());
        };

        append::append_entry(path, key, value).map_err(|source| LoaderError::Append {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("appended {key} to {} (selected [{section}])", path.display());
        Ok(())
    }
}

impl Default for IniLoader<NullSink> {
    fn default() -> Self {
        Self::new(NullSink)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;

    const CONNECT: &str = "\
[connect]
log_server_ip=127.0.0.1
port=9000
[connect]
log_server_ip=10.0.0.1
";

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sectini_loader_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── Query contract ────────────────────────────────────────────────────────

    #[test]
    fn test_duplicate_section_keeps_first_block() {
        // Arrange
        let mut loader = IniLoader::from_text(CONNECT, MemorySink::new());

        // Act
        loader.select_section("connect");

        // Assert
        assert_eq!(loader.load_string("log_server_ip", ""), "127.0.0.1");
        assert_eq!(loader.load_int("port", 0), 9000);
        assert_eq!(
            loader.sink().lines(),
            [
                "load start: <memory>",
                "duplicate section found: connect",
                "load complete: <memory>"
            ]
        );
    }

    #[test]
    fn test_raw_without_selection_is_none() {
        let loader = IniLoader::from_text(CONNECT, NullSink);
        assert_eq!(loader.current_section(), None);
        assert_eq!(loader.raw("port"), None);
        assert_eq!(loader.load_int("port", -1), -1);
    }

    #[test]
    fn test_unknown_section_yields_defaults_for_every_loader() {
        let mut loader = IniLoader::from_text(CONNECT, NullSink);
        loader.select_section("missing");

        assert_eq!(loader.current_section(), Some("missing"));
        assert_eq!(loader.load_string("port", "d"), "d");
        assert_eq!(loader.load_int("port", 7), 7);
        assert_eq!(loader.load_float("port", 2.5), 2.5);
        assert!(loader.load_bool("port", true));
    }

    #[test]
    fn test_empty_selection_clears_current_section() {
        let mut loader = IniLoader::from_text(CONNECT, NullSink);
        loader.select_section("connect");
        loader.select_section("");
        assert_eq!(loader.current_section(), None);
        assert_eq!(loader.raw("port"), None);
    }

    #[test]
    fn test_load_bool_narrow_truthiness() {
        let text = "[f]\non=1\noff=0\nyes=yes\ntrue=true\n";
        let mut loader = IniLoader::from_text(text, NullSink);
        loader.select_section("f");

        assert!(loader.load_bool("on", false));
        assert!(!loader.load_bool("off", false));
        assert!(!loader.load_bool("yes", false));
        assert!(!loader.load_bool("true", false));
        assert!(!loader.load_bool("absent", false));
        assert!(loader.load_bool("absent", true));
    }

    #[test]
    fn test_load_parsed_uses_from_str() {
        let mut loader = IniLoader::from_text("[net]\nport=24800\n", NullSink);
        loader.select_section("net");
        assert_eq!(loader.load_parsed::<u16>("port", 0), 24800);
        assert_eq!(loader.load_parsed::<u8>("port", 9), 9);
    }

    // ── File-backed behaviour ─────────────────────────────────────────────────

    #[test]
    fn test_open_missing_source_is_empty_and_reported() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("absent.ini");

        // Act
        let loader = IniLoader::open(&path, MemorySink::new()).unwrap();

        // Assert
        assert!(loader.document().is_empty());
        assert_eq!(
            loader.sink().lines(),
            [format!("source does not exist: {}", path.display())]
        );
        assert!(loader.sink().is_closed());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_value_does_not_touch_document_until_reload() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("app.ini");
        fs::write(&path, "[connect]\nport=9000\n").unwrap();
        let mut loader = IniLoader::open(&path, NullSink).unwrap();
        loader.select_section("connect");

        // Act
        loader.write_value("newkey", "5").unwrap();

        // Assert
        assert_eq!(loader.raw("newkey"), None);
        loader.reload().unwrap();
        assert_eq!(loader.current_section(), Some("connect"));
        assert_eq!(loader.raw("newkey"), Some("5"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_value_lands_in_last_section_not_selected_one() {
        let dir = temp_dir();
        let path = dir.join("app.ini");
        fs::write(&path, "[first]\na=1\n[last]\nb=2\n").unwrap();
        let mut loader = IniLoader::open(&path, NullSink).unwrap();
        loader.select_section("first");

        loader.write_value("c", "3").unwrap();
        loader.reload().unwrap();

        assert_eq!(loader.document().get("first", "c"), None);
        assert_eq!(loader.document().get("last", "c"), Some("3"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_value_without_selection_is_noop() {
        let dir = temp_dir();
        let path = dir.join("app.ini");
        fs::write(&path, "[a]\nx=1\n").unwrap();
        let loader = IniLoader::open(&path, NullSink).unwrap();

        loader.write_value("y", "2").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[a]\nx=1\n");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_value_without_source_is_noop() {
        let mut loader = IniLoader::from_text("[a]\nx=1\n", NullSink);
        loader.select_section("a");
        assert!(loader.write_value("y", "2").is_ok());
    }

    #[test]
    fn test_set_source_clears_selection_and_replaces_document() {
        let dir = temp_dir();
        let one = dir.join("one.ini");
        let two = dir.join("two.ini");
        fs::write(&one, "[a]\nx=1\n").unwrap();
        fs::write(&two, "[b]\ny=2\n").unwrap();
        let mut loader = IniLoader::open(&one, NullSink).unwrap();
        loader.select_section("a");

        loader.set_source(&two).unwrap();

        assert_eq!(loader.source(), Some(two.as_path()));
        assert_eq!(loader.current_section(), None);
        assert!(!loader.document().contains_section("a"));
        assert_eq!(loader.document().get("b", "y"), Some("2"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let dir = temp_dir();
        let path = dir.join("bytes.ini");
        fs::write(&path, b"[a]\nname=caf\xff\nok=1\n").unwrap();

        let mut loader = IniLoader::open(&path, NullSink).unwrap();
        loader.select_section("a");

        assert_eq!(loader.load_string("name", ""), "caf\u{fffd}");
        assert_eq!(loader.load_int("ok", 0), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reload_without_source_is_noop() {
        let mut loader = IniLoader::from_text("[a]\nx=1\n", NullSink);
        loader.reload().unwrap();
        assert_eq!(loader.document().get("a", "x"), Some("1"));
    }

    #[test]
    fn test_unreadable_source_reports_read_then_append_errors() {
        // Arrange: a directory exists but is neither readable nor appendable
        // as a file.
        let dir = temp_dir();
        let mut loader = IniLoader::new(NullSink);

        // Act
        let read = loader.set_source(&dir);
        loader.select_section("a");
        let append = loader.write_value("k", "v");

        // Assert
        assert!(matches!(read, Err(LoaderError::Read { ref path, .. }) if *path == dir));
        assert!(loader.document().is_empty());
        assert!(matches!(append, Err(LoaderError::Append { ref path, .. }) if *path == dir));

        fs::remove_dir_all(&dir).ok();
    }
}
