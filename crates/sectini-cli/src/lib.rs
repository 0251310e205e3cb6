//! Library half of the `sectini` command-line tool.
//!
//! - `settings` – optional TOML settings file (diagnostics log directory,
//!   logging level).
//! - `commands` – the `get`, `dump`, `append` and `check` subcommands,
//!   returning their output as strings.

pub mod commands;
pub mod settings;
