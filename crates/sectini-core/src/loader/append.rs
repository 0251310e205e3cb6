//! Append writer.
//!
//! Adds a literal `key=value` line to the end of a source file.  Nothing is
//! parsed and no in-memory document is touched.
//!
//! # Placement quirk
//!
//! The new line lands after whatever the file currently ends with.  On the
//! next load it therefore belongs to the **last** section in the file, no
//! matter which section the caller had selected.  If the file does not end
//! with a line terminator, the new text is joined onto the last line.  Both
//! behaviours are kept as-is; callers that need a key in a specific section
//! must arrange for that section to be last.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Appends `key=value\n` to `path`, creating the file if it does not exist.
pub fn append_entry(path: &Path, key: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format!("{key}={value}\n").as_bytes())
}
