//! Report parsers for reconnaissance tool output.
//!
//! Parsers turn a tool-specific report into a lazy sequence of `Record`s.
//! Per-line problems are reported as `ParseError`s alongside the records
//! so a single bad line never hides the rest of the report.

pub mod goohost;

use serde::Serialize;

pub use goohost::{GoohostParser, Records};

/// Error encountered while parsing an individual report line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParseError {
    /// 1-based line number in the report.
    pub line: usize,
    pub message: String,
}
