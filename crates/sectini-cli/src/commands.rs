//! Implementations of the `sectini` subcommands.
//!
//! Each command returns the text to print instead of printing it, so the
//! binary stays a thin wrapper and the behaviour can be tested directly.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use sectini_core::parse::{section_name, SectionAccumulator};
use sectini_core::{
    classify, ConfigDocument, DiagnosticSink, FileSink, IniLoader, LineKind, MemorySink, NullSink,
};
use tracing::warn;

use crate::settings::DiagnosticsSettings;

/// Type used to interpret a value for `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ValueKind {
    #[default]
    String,
    Int,
    Float,
    Bool,
}

/// Builds the diagnostics sink for `source` according to `settings`.
pub fn make_sink(source: &Path, settings: &DiagnosticsSettings) -> Box<dyn DiagnosticSink> {
    if settings.enabled {
        Box::new(FileSink::for_source(source, &settings.log_dir))
    } else {
        Box::new(NullSink)
    }
}

/// `get`: loads `key` from `section` as `kind`, falling back to `default`.
///
/// Without `--default` the type's zero value is used (`""`, `0`, `0.0`,
/// `false`).
///
/// # Errors
///
/// Fails if the source cannot be read or `default` does not parse as `kind`.
pub fn get(
    source: &Path,
    sink: Box<dyn DiagnosticSink>,
    section: &str,
    key: &str,
    kind: ValueKind,
    default: Option<&str>,
) -> anyhow::Result<String> {
    let mut loader = IniLoader::open(source, sink)?;
    loader.select_section(section);

    let out = match kind {
        ValueKind::String => loader.load_string(key, default.unwrap_or("")),
        ValueKind::Int => {
            let d = parse_default(default, 0i64, "integer")?;
            loader.load_int(key, d).to_string()
        }
        ValueKind::Float => {
            let d = parse_default(default, 0f64, "float")?;
            loader.load_float(key, d).to_string()
        }
        ValueKind::Bool => {
            let d = match default {
                Some(text) => text == "1",
                None => false,
            };
            let flag = if loader.load_bool(key, d) { "1" } else { "0" };
            flag.to_string()
        }
    };
    Ok(out)
}

fn parse_default<T>(default: Option<&str>, zero: T, what: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match default {
        Some(text) => text
            .parse()
            .with_context(|| format!("--default {text:?} is not a valid {what}")),
        None => Ok(zero),
    }
}

/// `dump`: renders every section and entry in document order.
pub fn dump(document: &ConfigDocument) -> String {
    let mut out = String::new();
    for (i, (name, section)) in document.sections().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{name}]");
        for (key, value) in section.iter() {
            let _ = writeln!(out, "{key}={value}");
        }
    }
    out
}

/// `dump` over a file.
///
/// # Errors
///
/// Fails if the source cannot be read.
pub fn dump_file(source: &Path, sink: Box<dyn DiagnosticSink>) -> anyhow::Result<String> {
    let loader = IniLoader::open(source, sink)?;
    Ok(dump(loader.document()))
}

/// Where an appended line ends up when the file is parsed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendTarget {
    /// The last header in the file names the selected section.
    Selected,
    /// The last header names another section, which receives the line.
    OtherSection(String),
    /// The last header's block is dropped on parse (malformed or duplicate
    /// header), taking the line with it.  Holds the raw header text.
    DroppedBlock(String),
    /// The file has no header, so the line sits outside every section.
    NoSection,
}

/// Works out which block a line appended to `text` is parsed into.
///
/// Looks at the last header in the file, not at the sections of the parsed
/// document: an empty trailing header never becomes a section but still
/// claims the appended line.
pub fn append_target(text: &str, section: &str) -> AppendTarget {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.lines().collect();

    let last_header = lines
        .iter()
        .enumerate()
        .rev()
        .find_map(|(at, line)| match classify(line) {
            LineKind::SectionHeader(header) => Some((at, header.into_owned())),
            _ => None,
        });
    let Some((at, header)) = last_header else {
        return AppendTarget::NoSection;
    };
    let Some(name) = section_name(&header) else {
        return AppendTarget::DroppedBlock(header);
    };

    // A name already taken by an earlier block makes this block a duplicate.
    let mut earlier = SectionAccumulator::new();
    for line in &lines[..at] {
        earlier.feed(line);
    }
    let (document, _) = earlier.finish();
    if document.contains_section(name) {
        return AppendTarget::DroppedBlock(header);
    }

    if name == section {
        AppendTarget::Selected
    } else {
        AppendTarget::OtherSection(name.to_string())
    }
}

/// `append`: appends `key=value` with `section` selected.
///
/// Returns where the line will be read back, and logs a warning unless that
/// is `section`.
///
/// # Errors
///
/// Fails if the source cannot be read or appended to.
pub fn append(
    source: &Path,
    sink: Box<dyn DiagnosticSink>,
    section: &str,
    key: &str,
    value: &str,
) -> anyhow::Result<AppendTarget> {
    let mut loader = IniLoader::open(source, sink)?;
    loader.select_section(section);

    let text = match fs::read(source) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).with_context(|| format!("reading {}", source.display())),
    };
    let target = append_target(&text, section);
    match &target {
        AppendTarget::Selected => {}
        AppendTarget::OtherSection(other) => warn!(
            "[{section}] is not the last section in {}; {key} will be read as part of [{other}]",
            source.display()
        ),
        AppendTarget::DroppedBlock(header) => warn!(
            "the last block in {} ({header}) is dropped on parse; {key} will not be readable",
            source.display()
        ),
        AppendTarget::NoSection => warn!(
            "{} has no section header; {key} will not be readable",
            source.display()
        ),
    }

    loader.write_value(key, value)?;
    Ok(target)
}

/// Result of the `check` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Anomaly lines, in input order.
    pub anomalies: Vec<String>,
    /// Number of sections that survived parsing.
    pub sections: usize,
}

impl CheckReport {
    /// Returns `true` when no anomalies were found.
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.anomalies {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(
            out,
            "{} section(s), {} anomaly(ies)",
            self.sections,
            self.anomalies.len()
        );
        out
    }
}

/// `check`: parses `source` and collects every anomaly.
///
/// A missing source counts as an anomaly.
///
/// # Errors
///
/// Fails if the source exists but cannot be read.
pub fn check(source: &Path) -> anyhow::Result<CheckReport> {
    let loader = IniLoader::open(source, MemorySink::new())?;
    let sections = loader.document().len();
    let anomalies = loader
        .into_sink()
        .diagnostics()
        .iter()
        .filter(|d| d.is_anomaly())
        .map(ToString::to_string)
        .collect();
    Ok(CheckReport {
        anomalies,
        sections,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
