//! Tree-sitter integration for structural entity extraction.
//!
//! This module wraps per-language grammars behind a compile-time registry,
//! parses whole files, and walks the resulting trees to collect function,
//! method, and constructor declarations with exact formatting metadata.

pub mod errors;
pub mod extractor;
pub mod lang;
pub mod parser;

pub use errors::GrammarError;
pub use extractor::{detect_indent, extract_from_file};
pub use lang::{Lang, TODO_REWRITE};
pub use parser::{EntityParser, ParsedSource};
