//! Single-pass parser: line classification plus section accumulation.
//!
//! Both sub-modules are pure over their input text.  The only side effect of
//! a parse is the stream of [`crate::Diagnostic`]s handed to the caller's
//! sink.

pub mod accumulator;
pub mod line;

pub use accumulator::{parse_document, parse_labeled, SectionAccumulator, MEMORY_SOURCE};
pub use line::{classify, section_name, LineKind};
