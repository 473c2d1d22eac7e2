//! HTML tokenizer module.
//!
//! Splits a document body into text runs and tag interiors by switching
//! between two states on `<` and `>`.

/// Named character references decoded inside text runs.
pub mod character_reference;
/// The tokenizer state machine.
pub mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use scanner::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};
