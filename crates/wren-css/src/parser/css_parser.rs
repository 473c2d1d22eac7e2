//! Stylesheet parser.
//!
//! The grammar is deliberately small: a rule is a selector made of
//! whitespace-separated tag names, then a `{ property: value; ... }` block.
//! Values are single words. Anything outside that grammar is skipped by
//! resynchronizing to the next `;` (inside a block) or `}` (between rules),
//! so a malformed declaration or rule never takes its neighbours down.

use std::fmt;

use thiserror::Error;

use crate::selector::Selector;

/// A failed grammar production.
///
/// These never escape [`CssParser::parse`] or [`CssParser::body`]; both
/// consume them by resynchronizing. They are public so the individual
/// productions can be driven and tested on their own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssParseError {
    /// A word was required but the next character cannot start one.
    #[error("expected a word at offset {offset}, found {found:?}")]
    ExpectedWord {
        /// Character offset into the source.
        offset: usize,
        /// The offending character, `None` at end of input.
        found: Option<char>,
    },

    /// A specific punctuation character was required.
    #[error("expected {expected:?} at offset {offset}, found {found:?}")]
    ExpectedLiteral {
        /// The character the grammar required.
        expected: char,
        /// Character offset into the source.
        offset: usize,
        /// The offending character, `None` at end of input.
        found: Option<char>,
    },
}

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-cased property name.
    pub property: String,
    /// The value word, case preserved.
    pub value: String,
}

impl Declaration {
    /// Create a declaration.
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A style rule: a selector and the declarations it applies, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Which elements the rule applies to.
    pub selector: Selector,
    /// Declarations in source order. A later duplicate property wins.
    pub declarations: Vec<Declaration>,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for decl in &self.declarations {
            write!(f, " {}: {};", decl.property, decl.value)?;
        }
        write!(f, " }}")
    }
}

/// A cursor over CSS source text.
pub struct CssParser {
    chars: Vec<char>,
    pos: usize,
}

impl CssParser {
    /// Create a parser positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Current character offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skip any run of whitespace.
    pub fn whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Consume a maximal run of alphanumerics and `#-.%`.
    ///
    /// # Errors
    ///
    /// Fails without consuming anything if the run would be empty.
    pub fn word(&mut self) -> Result<String, CssParseError> {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(CssParseError::ExpectedWord {
                offset: start,
                found: self.peek(),
            });
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Consume exactly `expected`.
    ///
    /// # Errors
    ///
    /// Fails without consuming anything on a mismatch or at end of input.
    pub fn literal(&mut self, expected: char) -> Result<(), CssParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            found => Err(CssParseError::ExpectedLiteral {
                expected,
                offset: self.pos,
                found,
            }),
        }
    }

    /// Parse `property : value`, lower-casing the property.
    ///
    /// # Errors
    ///
    /// Propagates the first failing primitive.
    pub fn pair(&mut self) -> Result<Declaration, CssParseError> {
        let property = self.word()?;
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.word()?;
        Ok(Declaration::new(property.to_lowercase(), value))
    }

    /// Advance to the first of `stops` without consuming it.
    ///
    /// Returns the stop character found, or `None` if input ran out first.
    pub fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.pos += 1;
        }
        None
    }

    /// Parse declarations up to a closing `}` (not consumed) or end of input.
    ///
    /// This is also the grammar of an inline `style` attribute. A declaration
    /// that fails to parse is skipped up to the next `;`; hitting `}` or the
    /// end of input while skipping ends the block. A pair that parsed but
    /// lacks its trailing `;` is still kept.
    pub fn body(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        while !self.at_end() && self.peek() != Some('}') {
            let step = self.pair().and_then(|decl| {
                declarations.push(decl);
                self.whitespace();
                self.literal(';')?;
                self.whitespace();
                Ok(())
            });
            if let Err(err) = step {
                log::trace!("css: skipping declaration: {err}");
                if self.ignore_until(&[';', '}']) == Some(';') {
                    self.pos += 1;
                    self.whitespace();
                } else {
                    break;
                }
            }
        }
        declarations
    }

    /// Parse a selector: one tag name, then one more per descendant step,
    /// up to (not including) the `{`.
    ///
    /// # Errors
    ///
    /// Fails if a step is not a word.
    pub fn selector(&mut self) -> Result<Selector, CssParseError> {
        let mut selector = Selector::tag(self.word()?.to_lowercase());
        self.whitespace();
        while !self.at_end() && self.peek() != Some('{') {
            let step = Selector::tag(self.word()?.to_lowercase());
            selector = Selector::descendant(selector, step);
            self.whitespace();
        }
        Ok(selector)
    }

    fn rule(&mut self) -> Result<Rule, CssParseError> {
        self.whitespace();
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.body();
        self.literal('}')?;
        Ok(Rule {
            selector,
            declarations,
        })
    }

    /// Parse a whole stylesheet into rules in source order.
    ///
    /// A rule that fails to parse is dropped by skipping past the next `}`.
    /// Parsing stops at end of input.
    pub fn parse(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        while !self.at_end() {
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    if self.at_end() {
                        break;
                    }
                    log::debug!("css: skipping rule: {err}");
                    if self.ignore_until(&['}']) == Some('}') {
                        self.pos += 1;
                        self.whitespace();
                    } else {
                        break;
                    }
                }
            }
        }
        rules
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '#' | '-' | '.' | '%')
}

/// Parse a stylesheet in one call.
#[must_use]
pub fn parse_stylesheet(source: &str) -> Vec<Rule> {
    CssParser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(pairs: &[(&str, &str)]) -> Vec<Declaration> {
        pairs.iter().map(|(p, v)| Declaration::new(*p, *v)).collect()
    }

    #[test]
    fn test_word_stops_at_punctuation() {
        let mut parser = CssParser::new("font-size:150%");
        assert_eq!(parser.word(), Ok("font-size".to_string()));
        assert_eq!(parser.position(), 9);
    }

    #[test]
    fn test_word_fails_on_empty_run() {
        let mut parser = CssParser::new(":red");
        assert_eq!(
            parser.word(),
            Err(CssParseError::ExpectedWord {
                offset: 0,
                found: Some(':')
            })
        );
    }

    #[test]
    fn test_literal_fails_at_end_of_input() {
        let mut parser = CssParser::new("");
        assert!(matches!(
            parser.literal(';'),
            Err(CssParseError::ExpectedLiteral { found: None, .. })
        ));
    }

    #[test]
    fn test_body_without_trailing_semicolon_keeps_pair() {
        let mut parser = CssParser::new("color:red");
        assert_eq!(parser.body(), decls(&[("color", "red")]));
    }

    #[test]
    fn test_body_lowercases_property_only() {
        let mut parser = CssParser::new("COLOR: Red;");
        assert_eq!(parser.body(), decls(&[("color", "Red")]));
    }

    #[test]
    fn test_body_skips_bad_declaration() {
        let mut parser = CssParser::new("@color: red; font-weight: bold;");
        assert_eq!(parser.body(), decls(&[("font-weight", "bold")]));
    }

    #[test]
    fn test_body_keeps_first_word_of_function_value() {
        let mut parser = CssParser::new("color: rgb(1,2,3); font-weight: bold;");
        assert_eq!(
            parser.body(),
            decls(&[("color", "rgb"), ("font-weight", "bold")])
        );
    }

    #[test]
    fn test_body_stops_at_closing_brace() {
        let mut parser = CssParser::new("color: red; } p { color: blue; }");
        assert_eq!(parser.body(), decls(&[("color", "red")]));
        assert_eq!(parser.peek(), Some('}'));
    }

    #[test]
    fn test_parse_descendant_selector() {
        let rules = parse_stylesheet("div  P { color: blue; }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector.to_string(), "div p");
        assert_eq!(rules[0].selector.specificity(), 2);
    }

    #[test]
    fn test_parse_skips_malformed_rule() {
        let rules = parse_stylesheet("h1, h2 { color: red; } p { color: blue; }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector.to_string(), "p");
    }

    #[test]
    fn test_parse_unterminated_rule_is_dropped() {
        let rules = parse_stylesheet("p { color: blue; } div { color: red;");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_rule_display() {
        let rules = parse_stylesheet("pre { background-color: gray; }");
        assert_eq!(rules[0].to_string(), "pre { background-color: gray; }");
    }
}
