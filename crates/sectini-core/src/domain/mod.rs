//! Domain entities for sectioned configuration.
//!
//! This module contains the queryable end state of a parse and nothing else:
//! no file access, no diagnostics, no parsing rules.
//!
//! # First-wins (for beginners)
//!
//! A configuration file can mention the same key twice in one section, or the
//! same section header twice.  This crate keeps the **first** definition and
//! discards the later one.  The discarded definition is not silently lost: the
//! parser reports it through the diagnostics sink so an operator can clean up
//! the file.  Merging or overwriting would change which value wins depending on
//! file order, which is exactly what first-wins avoids.

/// Section name → key → raw value store.
///
/// See [`document::ConfigDocument`] for the main type.
pub mod document;
