//! Integration tests for the CSS tokenizer.

use koala_css::tokenizer::{CSSToken, HashType, NumericType, SourceSpan, TextPosition, tokenize};

/// Tokenize `input` and keep only the token kinds.
fn kinds(input: &str) -> Vec<CSSToken> {
    tokenize(input).into_iter().map(|token| token.kind).collect()
}

#[test]
fn test_eof_always_last() {
    for input in ["", "   \t\n  ", "a", "/* only a comment */"] {
        let tokens = kinds(input);
        assert!(matches!(tokens.last(), Some(CSSToken::EOF)), "input {input:?}");
    }
}

#[test]
fn test_at_keyword_and_function() {
    let tokens = kinds("@media rgb(");
    assert_eq!(tokens[0], CSSToken::AtKeyword("media".to_string()));
    assert!(matches!(tokens[1], CSSToken::Whitespace));
    assert_eq!(tokens[2], CSSToken::Function("rgb".to_string()));
}

#[test]
fn test_hash_types() {
    match &kinds("#header")[0] {
        CSSToken::Hash { value, hash_type } => {
            assert_eq!(value, "header");
            assert_eq!(*hash_type, HashType::Id);
        }
        other => panic!("Expected Hash token, got {other:?}"),
    }
    // A name starting with a digit cannot be an ID selector.
    match &kinds("#123")[0] {
        CSSToken::Hash { hash_type, .. } => assert_eq!(*hash_type, HashType::Unrestricted),
        other => panic!("Expected Hash token, got {other:?}"),
    }
}

#[test]
fn test_strings_and_urls() {
    assert_eq!(kinds("'hello world'")[0], CSSToken::String("hello world".to_string()));
    assert_eq!(kinds("\"a\\\"b\"")[0], CSSToken::String("a\"b".to_string()));
    assert_eq!(kinds("url( image.png )")[0], CSSToken::Url("image.png".to_string()));
    // A quoted url() is a function around a string.
    let quoted = kinds("url(\"x.css\")");
    assert_eq!(quoted[0], CSSToken::Function("url".to_string()));
    assert_eq!(quoted[1], CSSToken::String("x.css".to_string()));
    assert!(matches!(kinds("\"broken\nstring\"")[0], CSSToken::BadString));
}

#[test]
fn test_numbers() {
    match &kinds("-10")[0] {
        CSSToken::Number {
            value,
            int_value,
            numeric_type,
        } => {
            assert!((value + 10.0).abs() < f64::EPSILON);
            assert_eq!(*int_value, Some(-10));
            assert_eq!(*numeric_type, NumericType::Integer);
        }
        other => panic!("Expected Number token, got {other:?}"),
    }
    match &kinds("3.14")[0] {
        CSSToken::Number { numeric_type, .. } => assert_eq!(*numeric_type, NumericType::Number),
        other => panic!("Expected Number token, got {other:?}"),
    }
    match &kinds("50%")[0] {
        CSSToken::Percentage { value, .. } => assert!((value - 50.0).abs() < f64::EPSILON),
        other => panic!("Expected Percentage token, got {other:?}"),
    }
    match &kinds("1.5em")[0] {
        CSSToken::Dimension { value, unit, .. } => {
            assert!((value - 1.5).abs() < f64::EPSILON);
            assert_eq!(unit, "em");
        }
        other => panic!("Expected Dimension token, got {other:?}"),
    }
}

#[test]
fn test_punctuation() {
    let tokens = kinds(":;,{}[]()");
    assert!(matches!(
        tokens.as_slice(),
        [
            CSSToken::Colon,
            CSSToken::Semicolon,
            CSSToken::Comma,
            CSSToken::LeftBrace,
            CSSToken::RightBrace,
            CSSToken::LeftBracket,
            CSSToken::RightBracket,
            CSSToken::LeftParen,
            CSSToken::RightParen,
            CSSToken::EOF,
        ]
    ));
}

#[test]
fn test_comments_and_cdo_cdc() {
    let tokens = kinds("/* comment */color");
    assert_eq!(tokens[0], CSSToken::Ident("color".to_string()));

    let tokens = kinds("<!-- -->");
    assert!(matches!(tokens[0], CSSToken::CDO));
    assert!(matches!(tokens[1], CSSToken::Whitespace));
    assert!(matches!(tokens[2], CSSToken::CDC));
}

#[test]
fn test_selector_delims() {
    let tokens = kinds("a>b~c+d");
    assert_eq!(tokens[1], CSSToken::Delim('>'));
    assert_eq!(tokens[3], CSSToken::Delim('~'));
    assert_eq!(tokens[5], CSSToken::Delim('+'));
}

#[test]
fn test_spans_slice_source() {
    let source = "p { color: red }";
    let tokens = tokenize(source);
    let texts: Vec<&str> = tokens.iter().map(|token| token.text(source)).collect();
    assert_eq!(texts, ["p", " ", "{", " ", "color", ":", " ", "red", " ", "}", ""]);
    assert_eq!(tokens[4].span, SourceSpan::new(4, 9));
    assert_eq!(tokens[4].span.to(tokens[7].span).slice(source), "color: red");
}

#[test]
fn test_spans_are_byte_offsets() {
    let source = "é a";
    let tokens = tokenize(source);
    assert_eq!(tokens[0].span, SourceSpan::new(0, 2));
    assert_eq!(tokens[2].text(source), "a");
}

#[test]
fn test_positions_track_lines() {
    let source = "a {\n  color: red;\n}";
    let tokens = tokenize(source);
    let color = tokens
        .iter()
        .find(|token| token.kind == CSSToken::Ident("color".to_string()))
        .unwrap();
    assert_eq!(color.position, TextPosition { line: 2, column: 3 });
    let close = tokens.iter().find(|token| token.kind == CSSToken::RightBrace).unwrap();
    assert_eq!(close.position.to_string(), "3:1");
}
