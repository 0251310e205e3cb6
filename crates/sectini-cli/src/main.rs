//! `sectini`: inspect and extend sectioned `key=value` configuration files.
//!
//! # Usage
//!
//! ```text
//! sectini [OPTIONS] <COMMAND>
//!
//! Commands:
//!   get     Print one value from a section
//!   dump    Print every section and entry
//!   append  Append `key=value` to the end of the file
//!   check   Report duplicate keys, duplicate sections and bad headers
//!
//! Options:
//!   --settings <PATH>   TOML settings file [env: SECTINI_SETTINGS]
//!   --log-dir <DIR>     Write diagnostics logs into DIR (enables them)
//!   --no-diagnostics    Never write diagnostics logs
//! ```
//!
//! # Logging
//!
//! `RUST_LOG` takes precedence over `[logging] level` from the settings file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sectini_cli::commands::{self, ValueKind};
use sectini_cli::settings::{load_settings, Settings};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and extend sectioned `key=value` configuration files.
#[derive(Debug, Parser)]
#[command(name = "sectini", version)]
struct Cli {
    /// TOML settings file.  Missing files fall back to defaults.
    #[arg(long, global = true, env = "SECTINI_SETTINGS")]
    settings: Option<PathBuf>,

    /// Directory for diagnostics logs.  Implies diagnostics are enabled.
    #[arg(long, global = true, conflicts_with = "no_diagnostics")]
    log_dir: Option<PathBuf>,

    /// Disable diagnostics logs even if the settings file enables them.
    #[arg(long, global = true)]
    no_diagnostics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one value from a section.
    Get {
        file: PathBuf,
        section: String,
        key: String,
        /// How to interpret the value.
        #[arg(long = "as", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,
        /// Value printed when the key is absent or does not parse.
        #[arg(long)]
        default: Option<String>,
    },
    /// Print every section and entry in file order.
    Dump { file: PathBuf },
    /// Append `key=value` to the end of the file.
    ///
    /// The entry is read back as part of the LAST section in the file,
    /// whatever section is named here.
    Append {
        file: PathBuf,
        section: String,
        key: String,
        value: String,
    },
    /// Report anomalies; exits with status 1 if any are found.
    Check { file: PathBuf },
}

impl Cli {
    /// Applies the command-line overrides on top of the settings file.
    fn effective_settings(&self) -> anyhow::Result<Settings> {
        let mut settings = load_settings(self.settings.as_deref()).with_context(|| {
            format!(
                "loading settings from {}",
                self.settings
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            )
        })?;
        if let Some(dir) = &self.log_dir {
            settings.diagnostics.enabled = true;
            settings.diagnostics.log_dir = dir.clone();
        }
        if self.no_diagnostics {
            settings.diagnostics.enabled = false;
        }
        Ok(settings)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = cli.effective_settings()?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("effective settings: {settings:?}");

    match cli.command {
        Command::Get {
            file,
            section,
            key,
            kind,
            default,
        } => {
            let sink = commands::make_sink(&file, &settings.diagnostics);
            let value = commands::get(&file, sink, &section, &key, kind, default.as_deref())
                .with_context(|| format!("reading {}", file.display()))?;
            println!("{value}");
        }
        Command::Dump { file } => {
            let sink = commands::make_sink(&file, &settings.diagnostics);
            let text = commands::dump_file(&file, sink)
                .with_context(|| format!("reading {}", file.display()))?;
            print!("{text}");
        }
        Command::Append {
            file,
            section,
            key,
            value,
        } => {
            let sink = commands::make_sink(&file, &settings.diagnostics);
            commands::append(&file, sink, &section, &key, &value)
                .with_context(|| format!("appending to {}", file.display()))?;
            info!("appended {key}={value} to {}", file.display());
        }
        Command::Check { file } => {
            let report =
                commands::check(&file).with_context(|| format!("checking {}", file.display()))?;
            print!("{}", report.render());
            if !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
