//! HTML tokenizer and tree builder for the Wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: a two-state scan that splits the body into text runs
//!   and tag interiors, with whitespace-split attribute parsing
//! - **Tree builder**: a stack of open elements with implicit
//!   `html`/`head`/`body` repair, void elements, and silent recovery from
//!   stray end tags
//! - **View-source mode**: the raw body as a single text leaf
//!
//! Parsing never fails. Whatever the input, the result is a tree whose
//! root is `<html>` with at most one `<head>` and one `<body>` child, in
//! that order.

/// HTML parser and tree construction.
pub mod parser;
/// Tag-name sets (void, head-only, block-level).
pub mod tags;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, ParseIssue, dump_tree, print_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

use wren_dom::DomTree;

/// Parse a document body into a DOM tree.
///
/// With `view_source` set, the body is not parsed at all: the tree is a
/// single text leaf holding it verbatim.
#[must_use]
pub fn parse_document(body: &str, view_source: bool) -> DomTree {
    if view_source {
        return DomTree::text_leaf(body);
    }
    let mut tokenizer = HTMLTokenizer::new(body.to_string());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}
