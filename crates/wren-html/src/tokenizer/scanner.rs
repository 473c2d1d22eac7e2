use strum_macros::Display;

use super::character_reference;
use super::token::Token;

/// The tokenizer state machine.
///
/// `<` always enters [`TokenizerState::Tag`]; `>` inside a tag leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Accumulating character data between tags.
    Data,
    /// Accumulating the interior of a `<...>` pair.
    Tag,
}

/// Single-pass HTML tokenizer.
pub struct HTMLTokenizer {
    input: String,
    state: TokenizerState,
    buffer: String,
    tokens: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a tokenizer over a document body.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            input,
            state: TokenizerState::Data,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input.
    ///
    /// Text left over at the end is emitted; an unterminated tag is dropped.
    pub fn run(&mut self) {
        let input = std::mem::take(&mut self.input);
        for c in input.chars() {
            match (self.state, c) {
                (_, '<') => {
                    // A '<' inside a tag abandons the partial tag as text.
                    self.emit_text();
                    self.state = TokenizerState::Tag;
                }
                (TokenizerState::Tag, '>') => {
                    self.emit_tag();
                    self.state = TokenizerState::Data;
                }
                _ => self.buffer.push(c),
            }
        }
        if self.state == TokenizerState::Data {
            self.emit_text();
        } else {
            log::trace!("dropping unterminated tag <{}", self.buffer);
            self.buffer.clear();
        }
        self.input = input;
    }

    /// The tokens produced so far.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consume the tokenizer and return its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn emit_text(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let data = character_reference::decode(&self.buffer);
        self.buffer.clear();
        self.tokens.push(Token::Text { data });
    }

    fn emit_tag(&mut self) {
        let interior = std::mem::take(&mut self.buffer);
        if let Some(token) = Token::from_tag_interior(&interior) {
            self.tokens.push(token);
        }
    }
}
