//! # sectini-core
//!
//! Loader for line-oriented configuration files made of `[section]` headers
//! and `key=value` pairs.
//!
//! The crate has no OS-specific code and no async runtime.  A document is
//! parsed in a single forward pass into a section-scoped store, then queried
//! through typed accessors relative to a caller-selected "current section".
//!
//! # Architecture overview (for beginners)
//!
//! ```text
//! text ──► parse::line          (classify each line)
//!      ──► parse::accumulator   (group entries under headers, first wins)
//!      ──► domain::document     (section name → key → raw value)
//!      ──► loader::IniLoader    (select a section, load typed values,
//!                                append new lines to the backing file)
//! ```
//!
//! - **`parse`** – The line classifier and the section accumulator state
//!   machine.  Pure functions over text; no I/O.
//!
//! - **`domain`** – The queryable end state: [`ConfigDocument`] and
//!   [`SectionMap`].
//!
//! - **`diagnostics`** – Anomalies found while parsing (duplicate keys,
//!   duplicate sections, malformed headers) and the [`DiagnosticSink`] trait
//!   that receives them.  Callers wire a file-backed, in-memory, or null sink.
//!
//! - **`loader`** – [`IniLoader`], which owns the backing source path, the
//!   parsed document, the selected section, and the sink.
//!
//! # Example
//!
//! ```rust
//! use sectini_core::{IniLoader, NullSink};
//!
//! let text = "[connect]\nlog_server_ip=127.0.0.1\nport=9000\n";
//! let mut loader = IniLoader::from_text(text, NullSink);
//! loader.select_section("connect");
//! assert_eq!(loader.load_string("log_server_ip", ""), "127.0.0.1");
//! assert_eq!(loader.load_int("port", 0), 9000);
//! ```

pub mod diagnostics;
pub mod domain;
pub mod loader;
pub mod parse;

// Re-export the most-used types at the crate root so callers can write
// `sectini_core::IniLoader` instead of `sectini_core::loader::IniLoader`.
pub use diagnostics::{Diagnostic, DiagnosticSink, FileSink, MemorySink, NullSink};
pub use domain::document::{ConfigDocument, SectionMap};
pub use loader::{IniLoader, LoaderError};
pub use parse::accumulator::parse_document;
pub use parse::line::{classify, LineKind};
