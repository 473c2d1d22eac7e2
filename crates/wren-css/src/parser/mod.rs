//! CSS parser module.

/// Word-based stylesheet and declaration-block parser.
pub mod css_parser;

pub use css_parser::{CssParseError, CssParser, Declaration, Rule, parse_stylesheet};
