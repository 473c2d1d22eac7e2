//! Integration tests for the HTML tokenizer.

use wren_html::{Attribute, HTMLTokenizer, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input.to_string());
    tokenizer.run();
    tokenizer.into_tokens()
}

fn text(data: &str) -> Token {
    Token::Text {
        data: data.to_string(),
    }
}

#[test]
fn test_plain_text() {
    assert_eq!(tokenize("Hello"), vec![text("Hello")]);
}

#[test]
fn test_text_and_tags_alternate() {
    let tokens = tokenize("<p>Hello <b>World</b></p>");
    assert_eq!(tokens.len(), 6);
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "p"));
    assert_eq!(tokens[1], text("Hello "));
    assert!(matches!(&tokens[2], Token::StartTag { name, .. } if name == "b"));
    assert_eq!(tokens[3], text("World"));
    assert_eq!(tokens[4], Token::EndTag { name: "b".into() });
    assert_eq!(tokens[5], Token::EndTag { name: "p".into() });
}

#[test]
fn test_attributes() {
    let tokens = tokenize("<a href=\"/x\" target='_blank' download>");
    match &tokens[0] {
        Token::StartTag { name, attributes } => {
            assert_eq!(name, "a");
            assert_eq!(
                attributes,
                &vec![
                    Attribute::new("href".into(), "/x".into()),
                    Attribute::new("target".into(), "_blank".into()),
                    Attribute::new("download".into(), String::new()),
                ]
            );
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_doctype_and_comment_are_declarations() {
    let tokens = tokenize("<!DOCTYPE html><!-- note -->");
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| matches!(t, Token::Declaration { .. })));
}

#[test]
fn test_unterminated_tag_is_dropped() {
    assert_eq!(tokenize("before<div class"), vec![text("before")]);
}

#[test]
fn test_greater_than_outside_tag_is_text() {
    assert_eq!(tokenize("a > b"), vec![text("a > b")]);
}

#[test]
fn test_entities_decoded_in_text() {
    assert_eq!(tokenize("1 &lt; 2"), vec![text("1 < 2")]);
}

#[test]
fn test_empty_tag_is_ignored() {
    assert_eq!(tokenize("<>x"), vec![text("x")]);
}
